//! HTML pages for the review flow
//!
//! Pages are small enough to build as strings. Every piece of user or model
//! text goes through `html_escape` before it is embedded.

use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::runlog::TIMESTAMP_FORMAT;
use crate::words::{BucketCounts, FrequencyCode, SelectionEntry};

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
.word{font-size:2.5rem;margin:1rem 0}\
.muted{color:#666}\
.error{color:#a00}\
button{font-size:1rem;margin:.25rem;padding:.4rem .9rem}\
table{border-collapse:collapse}td{padding:.2rem .8rem}";

/// Everything the flashcard page shows
#[derive(Debug, Clone)]
pub struct CardView {
    /// 1-based position in the batch
    pub number: usize,
    pub total: usize,
    pub word: String,
    pub choices: [FrequencyCode; 2],
    pub sentence: Option<String>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = encode_text(title),
        style = STYLE,
        body = body
    )
}

fn start_form(label: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/story\"><button type=\"submit\">{}</button></form>",
        encode_text(label)
    )
}

fn counts_table(counts: &BucketCounts) -> String {
    let rows = [
        ("Words", counts.total),
        ("Due", counts.due),
        ("Not reviewed", counts.pending),
        ("Tomorrow", counts.tomorrow),
        ("1 Week", counts.week),
        ("1 Month", counts.month),
        ("3 Months", counts.three_months),
        ("Burned", counts.burned),
    ];
    let mut html = String::from("<table>");
    for (label, value) in rows {
        html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>", label, value));
    }
    html.push_str("</table>");
    html
}

pub fn index_page(counts: &BucketCounts, last_run: Option<NaiveDateTime>) -> String {
    let last_run = match last_run {
        Some(at) => format!("Last review: {}", at.format(TIMESTAMP_FORMAT)),
        None => "No review yet".to_string(),
    };

    let body = format!(
        "<h1>Wortschatz</h1>\n<p class=\"muted\">{}</p>\n{}\n<p>Burned: {:.1}%</p>\n{}",
        encode_text(&last_run),
        counts_table(counts),
        counts.burned_percentage(),
        start_form("Start review")
    );
    layout("Wortschatz", &body)
}

pub fn story_page(words: &[String], burned_percentage: f64) -> String {
    if words.is_empty() {
        let body = "<h1>Nothing to review</h1>\n\
                    <p>No words are due and every word has been reviewed.</p>\n\
                    <p><a href=\"/\">Back</a></p>";
        return layout("Nothing to review", body);
    }

    let word_list: Vec<String> = words.iter().map(|w| encode_text(w).into_owned()).collect();
    let body = format!(
        "<h1>Your story</h1>\n\
         <p class=\"muted\">Words: {words}</p>\n\
         <p class=\"muted\">Burned: {burned:.1}%</p>\n\
         <p id=\"story\" class=\"muted\">Writing your story...</p>\n\
         <p><button type=\"button\" id=\"translate\">Translate</button></p>\n\
         <p id=\"translation\"></p>\n\
         <form method=\"post\" action=\"/anki\"><button type=\"submit\">Start flashcards</button></form>\n\
         <script>\n{script}\n</script>",
        words = word_list.join(", "),
        burned = burned_percentage,
        script = STORY_SCRIPT
    );
    layout("Your story", &body)
}

const STORY_SCRIPT: &str = r#"const story = document.getElementById('story');
async function poll() {
  const res = await fetch('/story/status');
  const data = await res.json();
  if (data.status === 'pending') { setTimeout(poll, 2000); return; }
  story.classList.remove('muted');
  story.textContent = data.story || data.error || '';
}
poll();
document.getElementById('translate').onclick = async () => {
  const res = await fetch('/story/translate', { method: 'POST' });
  document.getElementById('translation').textContent = await res.text();
};"#;

const CARD_SCRIPT: &str = r#"document.getElementById('reveal').onclick = async () => {
  const res = await fetch('/anki/translate', { method: 'POST' });
  document.getElementById('meaning').textContent = await res.text();
};"#;

pub fn card_page(card: &CardView) -> String {
    let sentence = card
        .sentence
        .as_deref()
        .map(|s| format!("<p class=\"muted\">{}</p>\n", encode_text(s)))
        .unwrap_or_default();

    let mut buttons = String::new();
    let mut offered: Vec<FrequencyCode> = Vec::with_capacity(2);
    for choice in card.choices {
        // Burned words offer the same choice twice
        if offered.contains(&choice) {
            continue;
        }
        offered.push(choice);
        buttons.push_str(&format!(
            "<button type=\"submit\" name=\"choice\" value=\"{}\">{}</button>",
            encode_double_quoted_attribute(choice.code()),
            encode_text(choice.label())
        ));
    }

    let body = format!(
        "<p class=\"muted\">Word {number} of {total}</p>\n\
         <div class=\"word\">{word}</div>\n\
         {sentence}\
         <p><button type=\"button\" id=\"reveal\">Translate</button> <span id=\"meaning\"></span></p>\n\
         <p>Review again:</p>\n\
         <form method=\"post\" action=\"/anki/answer\">{buttons}</form>\n\
         <script>\n{script}\n</script>",
        number = card.number,
        total = card.total,
        word = encode_text(&card.word),
        sentence = sentence,
        buttons = buttons,
        script = CARD_SCRIPT
    );
    layout(&card.word, &body)
}

pub fn complete_page(entries: &[SelectionEntry]) -> String {
    let mut rows = String::from("<table>");
    for entry in entries {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_text(&entry.word),
            encode_text(entry.frequency.label()),
            encode_text(&entry.review_date_string())
        ));
    }
    rows.push_str("</table>");

    let body = format!(
        "<h1>Review complete</h1>\n{}\n<p><a href=\"/\">Back</a></p>",
        rows
    );
    layout("Review complete", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n{}",
        encode_text(message),
        start_form("Start a new session")
    );
    layout("Error", &body)
}
