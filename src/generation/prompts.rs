//! Prompt builders for the review flow

use std::collections::BTreeMap;

use super::ChatMessage;

const PERSONA: &str = "You are a German teacher.";

/// Ask for a short A1-level German story using every selected word
pub fn story_messages(words: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PERSONA),
        ChatMessage::user(format!(
            "Write a story in German with maximum 3 sentences.\n\
             Only use words that are from the Goethe-Zertifikat A1 vocabulary list.\n\
             Make sure these words are in the story: {}",
            words.join(",")
        )),
    ]
}

/// Continue a story conversation with a request for an English translation
pub fn translation_messages(mut conversation: Vec<ChatMessage>, story: &str) -> Vec<ChatMessage> {
    conversation.push(ChatMessage::assistant(story));
    conversation.push(ChatMessage::user("Translate this German Story to English."));
    conversation
}

/// Few-shot prompt for a one-word English translation
pub fn word_translation_messages(word: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PERSONA),
        ChatMessage::user("One Word English translation for: Klima"),
        ChatMessage::assistant("Climate"),
        ChatMessage::user(format!("One Word English translation for: {}", word)),
    ]
}

/// Ask for one simple example sentence per word, one `word: sentence` per line
pub fn sentence_messages(words: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PERSONA),
        ChatMessage::user(format!(
            "For each of the following German words write one short example sentence \
             in German at Goethe-Zertifikat A1 level.\n\
             Answer with exactly one line per word in the form `word: sentence` and nothing else.\n\
             Words: {}",
            words.join(",")
        )),
    ]
}

/// Map a `word: sentence` reply back onto the requested words
///
/// Lines for words that were not requested are ignored. Matching is
/// case-insensitive and tolerates list markers and quotes around the word.
pub fn parse_sentences(reply: &str, words: &[String]) -> BTreeMap<String, String> {
    let mut sentences = BTreeMap::new();

    for line in reply.lines() {
        let Some((head, sentence)) = line.split_once(':') else {
            continue;
        };
        let head = head
            .trim()
            .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_ascii_digit() || c == '.')
            .trim()
            .trim_matches(|c: char| c == '`' || c == '"' || c == '*')
            .trim();
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if let Some(word) = words.iter().find(|w| w.to_lowercase() == head.to_lowercase()) {
            sentences
                .entry(word.clone())
                .or_insert_with(|| sentence.to_string());
        }
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_story_prompt_lists_words() {
        let messages = story_messages(&words(&["Apfel", "Brot"]));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("Apfel,Brot"));
        assert!(messages[1].content.contains("maximum 3 sentences"));
    }

    #[test]
    fn test_translation_continues_conversation() {
        let story = story_messages(&words(&["Apfel"]));
        let messages = translation_messages(story, "Ich esse einen Apfel.");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2], ChatMessage::assistant("Ich esse einen Apfel."));
        assert_eq!(messages[3].role, "user");
    }

    #[test]
    fn test_word_translation_is_few_shot() {
        let messages = word_translation_messages("Haus");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].content, "Climate");
        assert!(messages[3].content.ends_with("Haus"));
    }

    #[test]
    fn test_parse_sentences() {
        let reply = "Apfel: Ich esse einen Apfel.\n\
                     - **brot**: Das Brot ist frisch.\n\
                     2. Haus: Das Haus ist groß.\n\
                     Katze: Die Katze schläft.\n\
                     Kommentar ohne Doppelpunkt\n\
                     Apfel: Zweiter Satz wird ignoriert.";
        let parsed = parse_sentences(reply, &words(&["Apfel", "Brot", "Haus"]));

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["Apfel"], "Ich esse einen Apfel.");
        assert_eq!(parsed["Brot"], "Das Brot ist frisch.");
        assert_eq!(parsed["Haus"], "Das Haus ist groß.");
    }

    #[test]
    fn test_parse_sentences_keeps_colons_in_sentence() {
        let parsed = parse_sentences("Uhr: Es ist 10:30 Uhr.", &words(&["Uhr"]));
        assert_eq!(parsed["Uhr"], "Es ist 10:30 Uhr.");
    }
}
