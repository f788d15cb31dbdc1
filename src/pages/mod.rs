//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`escape`] (or [`script_json`] inside
//! inline scripts); stored telemetry is untrusted.

use chrono::DateTime;

use crate::models::tracking_event::TrackingEvent;
use crate::utils::html::{escape, script_json};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 1100px; padding: 0 1rem; color: #222; }
h1 { font-size: 1.6rem; }
input[type=text], input[type=url], input[type=password] { padding: .5rem; width: 100%; max-width: 420px; box-sizing: border-box; }
button { padding: .45rem 1rem; cursor: pointer; }
table { border-collapse: collapse; width: 100%; font-size: .85rem; }
th, td { border: 1px solid #ddd; padding: .35rem .5rem; text-align: left; vertical-align: top; word-break: break-word; }
th { background: #f4f4f4; }
.error { color: #b00020; }
.muted { color: #777; }
nav { display: flex; justify-content: space-between; align-items: center; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index() -> String {
    layout(
        "Link Tracker",
        r#"<nav><h1>Link Tracker</h1><a href="/dashboard">Dashboard</a></nav>
<form id="create-form">
  <p><input type="url" id="url" placeholder="https://example.com" required></p>
  <p><button type="submit">Create tracking link</button></p>
</form>
<p id="error" class="error"></p>
<div id="result" hidden>
  <p>Tracking link: <a id="tracking-url" target="_blank" rel="noopener"></a></p>
  <p><img id="qr" alt="QR code" width="240"></p>
</div>
<script>
document.getElementById('create-form').addEventListener('submit', async (e) => {
  e.preventDefault();
  const errorBox = document.getElementById('error');
  errorBox.textContent = '';
  const res = await fetch('/create_link', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ url: document.getElementById('url').value })
  });
  const data = await res.json();
  if (!res.ok) { errorBox.textContent = data.error || 'Request failed'; return; }
  const link = document.getElementById('tracking-url');
  link.href = data.tracking_url;
  link.textContent = data.tracking_url;
  document.getElementById('qr').src = 'data:image/png;base64,' + data.qr_code;
  document.getElementById('result').hidden = false;
});
</script>"#,
    )
}

pub fn login(show_error: bool) -> String {
    let error = if show_error {
        r#"<p class="error">Invalid username or password.</p>"#
    } else {
        ""
    };

    layout(
        "Login",
        &format!(
            r#"<h1>Dashboard login</h1>
{error}
<form method="post" action="/login">
  <p><input type="text" name="username" placeholder="Username" autocomplete="username" required></p>
  <p><input type="password" name="password" placeholder="Password" autocomplete="current-password" required></p>
  <p><button type="submit">Log in</button></p>
</form>"#
        ),
    )
}

/// Collects browser attributes, reports them, then follows the server's redirect.
pub fn landing(short_code: &str, original_url: &str) -> String {
    layout(
        "Redirecting…",
        &format!(
            r#"<p class="muted">Redirecting…</p>
<noscript><p><a href="{href}">Continue</a></p></noscript>
<script>
(async () => {{
  const shortCode = {code_json};
  const fallback = {url_json};
  const ua = navigator.userAgent;
  const os = /Windows/.test(ua) ? 'Windows' : /Android/.test(ua) ? 'Android'
    : /iPhone|iPad|iPod/.test(ua) ? 'iOS' : /Mac OS X/.test(ua) ? 'macOS'
    : /Linux/.test(ua) ? 'Linux' : 'Unknown';
  const browser = /Edg\//.test(ua) ? 'Edge' : /OPR\//.test(ua) ? 'Opera'
    : /Firefox\//.test(ua) ? 'Firefox' : /Chrome\//.test(ua) ? 'Chrome'
    : /Safari\//.test(ua) ? 'Safari' : 'Unknown';
  const data = {{
    shortCode,
    userAgent: ua,
    screenResolution: screen.width + 'x' + screen.height,
    language: navigator.language,
    os,
    browser,
    location: Intl.DateTimeFormat().resolvedOptions().timeZone || '',
    referrer: document.referrer
  }};
  try {{
    const raw = [ua, data.screenResolution, data.language, data.location,
      screen.colorDepth, navigator.hardwareConcurrency].join('|');
    const digest = await crypto.subtle.digest('SHA-256', new TextEncoder().encode(raw));
    data.fingerprint = Array.from(new Uint8Array(digest))
      .map((b) => b.toString(16).padStart(2, '0')).join('');
  }} catch (_) {{}}
  let target = fallback;
  try {{
    const res = await fetch('/api/track', {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json' }},
      body: JSON.stringify(data)
    }});
    const body = await res.json();
    if (body.redirect) target = body.redirect;
  }} catch (_) {{}}
  window.location.replace(target);
}})();
</script>"#,
            href = escape(original_url),
            code_json = script_json(short_code),
            url_json = script_json(original_url),
        ),
    )
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn cell(value: Option<&str>) -> String {
    format!("<td>{}</td>", escape(value.unwrap_or("")))
}

pub fn dashboard(username: &str, events: &[TrackingEvent]) -> String {
    let rows: String = events
        .iter()
        .map(|event| {
            format!(
                r#"<tr data-id="{id}">
<td>{time}</td>{ip}{code}{ua}{screen}{lang}{os}{browser}{location}{fingerprint}{referrer}
<td><button onclick="deleteEvent(this.closest('tr').dataset.id)">Delete</button></td>
</tr>
"#,
                id = escape(&event.id),
                time = escape(&format_timestamp(event.timestamp)),
                ip = cell(Some(&event.ip)),
                code = cell(event.short_code.as_deref()),
                ua = cell(event.user_agent.as_deref()),
                screen = cell(event.screen_resolution.as_deref()),
                lang = cell(event.language.as_deref()),
                os = cell(event.os.as_deref()),
                browser = cell(event.browser.as_deref()),
                location = cell(event.location.as_deref()),
                fingerprint = cell(event.fingerprint.as_deref()),
                referrer = cell(event.referrer.as_deref()),
            )
        })
        .collect();

    let table = if events.is_empty() {
        r#"<p class="muted">No visits recorded yet.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
<thead><tr><th>Time</th><th>IP</th><th>Link</th><th>User agent</th><th>Screen</th><th>Language</th><th>OS</th><th>Browser</th><th>Location</th><th>Fingerprint</th><th>Referrer</th><th></th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
        )
    };

    layout(
        "Dashboard",
        &format!(
            r#"<nav><h1>Tracking dashboard</h1><span>{user} · <a href="/logout">Log out</a></span></nav>
<p>{count} event(s) <button onclick="deleteAll()">Delete all</button></p>
{table}
<script>
async function deleteEvent(id) {{
  if (!confirm('Delete this record?')) return;
  const res = await fetch('/api/tracking/' + encodeURIComponent(id), {{ method: 'DELETE' }});
  if (res.ok) location.reload(); else alert('Delete failed');
}}
async function deleteAll() {{
  if (!confirm('Delete all records?')) return;
  const res = await fetch('/api/tracking', {{ method: 'DELETE' }});
  if (res.ok) location.reload(); else alert('Delete failed');
}}
</script>"#,
            user = escape(username),
            count = events.len(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::track_request::TrackPayload;

    #[test]
    fn landing_embeds_code_and_destination_safely() {
        let page = landing("abcd1234", "https://example.com/?q=\"</script>");
        assert!(page.contains(r#"const shortCode = "abcd1234";"#));
        assert!(page.contains("https://example.com/?q=&quot;&lt;/script&gt;"));
        assert_eq!(page.matches("</script>").count(), 1);
    }

    #[test]
    fn login_shows_error_only_when_asked() {
        assert!(login(true).contains("Invalid username or password"));
        assert!(!login(false).contains("Invalid username or password"));
    }

    #[test]
    fn dashboard_escapes_client_supplied_fields() {
        let payload = TrackPayload {
            user_agent: Some("<img src=x onerror=alert(1)>".to_string()),
            ..Default::default()
        };
        let event = TrackingEvent::new(payload, "10.0.0.1".to_string(), None);

        let page = dashboard("admin", &[event.clone()]);
        assert!(page.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!page.contains("<img src=x"));
        assert!(page.contains(&event.id));
    }

    #[test]
    fn empty_dashboard_says_so() {
        assert!(dashboard("admin", &[]).contains("No visits recorded yet."));
    }
}
