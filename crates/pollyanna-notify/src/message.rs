//! Per-participant message composition.

use pollyanna_core::{Pair, Year};
use serde::{Deserialize, Serialize};

/// One rendered notification, plain text and HTML alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Participant the message is for
    pub participant: String,
    /// Contact address
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn subject(year: Year) -> String {
    format!("SECRET EMAIL for SECRET SANTA! ({year})")
}

/// Render the message telling `participant` who they drew.
pub fn compose(
    participant: &str,
    contact: &str,
    pair: &Pair,
    year: Year,
    gif_url: Option<&str>,
) -> Message {
    let text = render_text(participant, &pair.regular, &pair.gag);

    let img_block = gif_url
        .map(|url| {
            format!(
                r#"<p><img src="{}" alt="Christmas GIF" width="480" height="269"></p>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let html = render_html(
        &escape_html(participant),
        &escape_html(&pair.regular),
        &escape_html(&pair.gag),
        &img_block,
    );

    Message {
        participant: participant.to_string(),
        to: contact.to_string(),
        subject: subject(year),
        text,
        html,
    }
}

fn render_text(name: &str, gift_name: &str, gag_name: &str) -> String {
    format!(
        "Ho Ho Ho {name}!

This email is from the Pollyanna (Secret Santa) Program.

You drew the following names:
    Genuine Gift: {gift_name}
    Gag Gift: {gag_name}

Have fun shopping!

P.S. Budgets for the gifts will be sent out at a later date.
Reach out if you received the same name twice.
"
    )
}

/// Arguments must already be HTML-escaped.
fn render_html(name: &str, gift_name: &str, gag_name: &str, img_block: &str) -> String {
    format!(
        r#"<html>
<body>
    <p>Ho Ho Ho {name}!</p>
    <p>This email is from the Pollyanna (Secret Santa) Program.</p>
    <p>You drew the following names:<br>
    <span style="padding-left: 20px;">Genuine Gift: {gift_name}</span><br>
    <span style="padding-left: 20px;">Gag Gift: {gag_name}</span>
    </p>
    <p>Have fun shopping!</p>
    <p>P.S. Budgets for the gifts will be sent out at a later date.<br>
    Reach out if you received the same name twice.</p>
    {img_block}
</body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
