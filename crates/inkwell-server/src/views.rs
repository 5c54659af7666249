//! HTML pages.
//!
//! Pages are plain strings: a shared layout around small per-page bodies.
//! Every user-controlled value goes through [`escape`] (text and
//! attributes) or [`href`] (URL path segments) before it is interpolated.
//! Rendered Markdown is inserted as-is; it comes from signed-in users only.

use std::fmt::Write as _;

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode a document name as a single path segment, escaped for an attribute.
fn href(name: &str) -> String {
    escape(&urlencoding::encode(name))
}

/// Wrap a page body in the shared layout, showing a flash message if present.
#[must_use]
pub fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let mut html = String::with_capacity(LAYOUT_HEAD.len() + body.len() + 256);
    html.push_str(&LAYOUT_HEAD.replace("{{TITLE}}", &escape(title)));
    if let Some(message) = flash {
        let _ = writeln!(html, "<p class=\"flash\">{}</p>", escape(message));
    }
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n</body></html>\n");
    html
}

/// Document listing with per-document actions and the sign-in state.
#[must_use]
pub fn index(documents: &[String], user: Option<&str>) -> String {
    let mut body = String::from("<ul class=\"documents\">\n");
    for name in documents {
        let link = href(name);
        let label = escape(name);
        let _ = writeln!(
            body,
            "<li><a href=\"/{link}\">{label}</a> \
             <a class=\"action\" href=\"/{link}/edit\">edit</a> \
             <form class=\"inline\" method=\"post\" action=\"/delete/{link}\">\
             <button type=\"submit\">delete</button></form></li>"
        );
    }
    body.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>\n");

    match user {
        Some(user) => {
            let _ = writeln!(
                body,
                "<form method=\"post\" action=\"/users/signout\">\
                 <p class=\"user-status\">Signed in as {}. \
                 <button type=\"submit\">Sign Out</button></p></form>",
                escape(user)
            );
        }
        None => body.push_str(
            "<form method=\"get\" action=\"/users/signin\">\
             <button type=\"submit\">Sign in</button></form>\n",
        ),
    }
    body
}

/// A rendered Markdown document.
#[must_use]
pub fn markdown(name: &str, fragment: &str) -> String {
    format!(
        "<article class=\"markdown\" data-document=\"{}\">\n{fragment}</article>\n",
        escape(name)
    )
}

/// Form for creating a document, pre-filled with the last attempted name.
#[must_use]
pub fn new_document(attempted: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/new\">\n\
         <label for=\"new_filename\">Add a new document:</label>\n\
         <input id=\"new_filename\" name=\"new_filename\" type=\"text\" value=\"{}\"/>\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n",
        escape(attempted)
    )
}

/// Form for replacing a document's content.
#[must_use]
pub fn edit_document(name: &str, content: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/{}\">\n\
         <label for=\"content\">Edit content of {}:</label>\n\
         <textarea id=\"content\" name=\"content\" rows=\"20\" cols=\"100\">{}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n\
         </form>\n",
        href(name),
        escape(name),
        escape(content)
    )
}

/// Sign-in form, pre-filled with the last attempted username.
#[must_use]
pub fn sign_in(username: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/users/signin\">\n\
         <div><label for=\"username\">Username:</label>\n\
         <input id=\"username\" name=\"username\" type=\"text\" value=\"{}\"/></div>\n\
         <div><label for=\"password\">Password:</label>\n\
         <input type=\"password\" id=\"password\" name=\"password\"/></div>\n\
         <button type=\"submit\">Sign In</button>\n\
         </form>\n",
        escape(username)
    )
}

/// Body of an error page.
#[must_use]
pub fn error(status: u16, message: &str) -> String {
    format!(
        "<h1>{status}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to documents</a></p>\n",
        escape(message)
    )
}

/// Document head and opening body tag shared by every page.
const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{{TITLE}} &middot; Inkwell</title>
<style>
body{font-family:Georgia,serif;max-width:760px;margin:0 auto;padding:24px;line-height:1.6;color:#222}
a{color:#2a5d8f}
.flash{background:#fff6d5;border:1px solid #e8d48a;padding:8px 12px;border-radius:4px}
.documents li{margin:4px 0}
.action{font-size:90%;margin-left:8px}
form.inline{display:inline;margin-left:8px}
textarea{width:100%;font-family:monospace}
label{display:block;margin-top:8px}
.markdown pre{background:#f4f4f4;padding:8px;overflow-x:auto}
</style></head>
<body>
"#;
