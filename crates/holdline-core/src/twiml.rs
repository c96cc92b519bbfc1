//! Voice response documents returned to the telephony provider.

use quick_xml::escape::escape;

pub const CONTENT_TYPE: &str = "text/xml";

pub const DEFAULT_GREETING: &str =
    "Thank you for calling Red Ball Market Global. Please hold for the next available agent.";
pub const DEFAULT_VOICE: &str = "joey";
pub const DEFAULT_LANGUAGE: &str = "en-US";

const APOLOGY: &str = "We're experiencing technical difficulties. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub message: String,
    pub voice: String,
    pub language: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self {
            message: DEFAULT_GREETING.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Greets the caller, then loops the hold music forever.
pub fn hold_response(greeting: &Greeting, music_url: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Response>\n\
         \x20   <Say voice=\"{voice}\" language=\"{language}\">{message}</Say>\n\
         \x20   <Play loop=\"0\">{url}</Play>\n\
         </Response>\n",
        voice = escape(greeting.voice.as_str()),
        language = escape(greeting.language.as_str()),
        message = escape(greeting.message.as_str()),
        url = escape(music_url),
    )
}

pub fn apology_response() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Response>\n\
         \x20   <Say>{message}</Say>\n\
         \x20   <Hangup/>\n\
         </Response>\n",
        message = escape(APOLOGY),
    )
}
