//! Server-rendered HTML for the signup, login and dashboard pages.

use time::format_description::well_known::Rfc3339;

use crate::accounts::repo::User;

/// Values echoed back into the signup form after a failed submit.
/// Passwords are never echoed.
#[derive(Debug, Default)]
pub struct SignupValues<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; max-width: 480px; margin: 40px auto; color: #222; }}
        label {{ display: block; margin-top: 12px; }}
        input {{ width: 100%; padding: 8px; box-sizing: border-box; }}
        button {{ margin-top: 16px; padding: 10px 18px; }}
        .error {{ background: #fdecea; border: 1px solid #f5c2c0; padding: 10px; border-radius: 4px; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
    )
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!(r#"<p class="error">{}</p>"#, escape_html(msg)),
        None => String::new(),
    }
}

pub fn signup_page(values: &SignupValues<'_>, error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Create account</h1>
{error}
<form method="post" action="/signup">
    <label>Full name <input name="name" value="{name}" required></label>
    <label>Username <input id="username" name="username" value="{username}" required></label>
    <label>Email <input type="email" name="email" value="{email}" required></label>
    <label>Phone <input name="phone" value="{phone}" placeholder="+55 11 98765-4321"></label>
    <label>Password <input id="password" type="password" name="password" required></label>
    <label>Confirm password <input type="password" name="confirm" required></label>
    <button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        error = error_block(error),
        name = escape_html(values.name),
        username = escape_html(values.username),
        email = escape_html(values.email),
        phone = escape_html(values.phone),
    );
    layout("Sign up", &body)
}

pub fn login_page(login: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="/login">
    <label>Username or email <input name="login" value="{login}" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/signup">Sign up</a></p>"#,
        error = error_block(error),
        login = escape_html(login),
    );
    layout("Log in", &body)
}

pub fn dashboard_page(user: &User) -> String {
    let member_since = user
        .created_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| user.created_at.to_string());
    let body = format!(
        r#"<h1>Hello, {name}</h1>
<dl>
    <dt>Username</dt><dd>{username}</dd>
    <dt>Email</dt><dd>{email}</dd>
    <dt>Phone</dt><dd>{phone}</dd>
    <dt>Member since</dt><dd>{since}</dd>
</dl>
<form method="post" action="/logout"><button type="submit">Log out</button></form>"#,
        name = escape_html(&user.full_name),
        username = escape_html(&user.username),
        email = escape_html(&user.email),
        phone = escape_html(user.phone.as_deref().unwrap_or("-")),
        since = escape_html(&member_since),
    );
    layout("Dashboard", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn signup_echoes_escaped_values_and_error() {
        let html = signup_page(
            &SignupValues {
                name: "<b>Bob</b>",
                username: "bob",
                ..Default::default()
            },
            Some("Username already taken"),
        );
        assert!(html.contains("&lt;b&gt;Bob&lt;/b&gt;"));
        assert!(html.contains(r#"value="bob""#));
        assert!(html.contains("Username already taken"));
        assert!(!html.contains("<b>Bob</b>"));
    }

    #[test]
    fn login_without_error_has_no_error_block() {
        let html = login_page("", None);
        assert!(!html.contains(r#"class="error""#));
    }
}
