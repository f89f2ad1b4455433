/// Keyword-based intent classification for voice commands
///
/// Buckets are checked in a fixed priority order and the first bucket with a
/// matching keyword wins. Matching is a case-insensitive substring search, so
/// inflections such as "doctors" or "reschedule" still hit. The one exception:
/// the appointment keyword "doctor" does not count where it sits inside a
/// doctor-listing phrase such as "show doctors".
use serde::{Deserialize, Serialize};

pub const CHAT_TAG: &str = "CHAT";
const VOICE_COMMAND_PREFIX: &str = "VOICE_COMMAND:";

/// Voice command buckets, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceCommand {
    Appointment,
    FaceAnalysis,
    HairAnalysis,
    MedicalRecords,
    Doctors,
    Profile,
}

impl VoiceCommand {
    /// Priority order used by [`IntentClassifier::classify`]
    pub const PRIORITY: [VoiceCommand; 6] = [
        VoiceCommand::Appointment,
        VoiceCommand::FaceAnalysis,
        VoiceCommand::HairAnalysis,
        VoiceCommand::MedicalRecords,
        VoiceCommand::Doctors,
        VoiceCommand::Profile,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            VoiceCommand::Appointment => &["appointment", "book", "schedule", "doctor"],
            VoiceCommand::FaceAnalysis => &["face analysis", "analyze face", "skin check"],
            VoiceCommand::HairAnalysis => &["hair analysis", "hair check", "hair health"],
            VoiceCommand::MedicalRecords => &["medical records", "health records", "my records"],
            VoiceCommand::Doctors => &["show doctors", "list doctors", "available doctors"],
            VoiceCommand::Profile => &["my profile", "profile", "account"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceCommand::Appointment => "APPOINTMENT",
            VoiceCommand::FaceAnalysis => "FACE_ANALYSIS",
            VoiceCommand::HairAnalysis => "HAIR_ANALYSIS",
            VoiceCommand::MedicalRecords => "MEDICAL_RECORDS",
            VoiceCommand::Doctors => "DOCTORS",
            VoiceCommand::Profile => "PROFILE",
        }
    }
}

/// Result of classifying one message. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedIntent {
    pub command: Option<VoiceCommand>,
}

impl ClassifiedIntent {
    pub fn chat() -> Self {
        Self { command: None }
    }

    pub fn detected(&self) -> bool {
        self.command.is_some()
    }

    /// Wire tag, e.g. `VOICE_COMMAND:APPOINTMENT` or `CHAT`
    pub fn tag(&self) -> String {
        match self.command {
            Some(command) => format!("{}{}", VOICE_COMMAND_PREFIX, command.as_str()),
            None => CHAT_TAG.to_string(),
        }
    }
}

pub struct IntentClassifier;

impl IntentClassifier {
    pub fn classify(message: &str) -> ClassifiedIntent {
        let text = message.to_lowercase();
        if text.trim().is_empty() {
            return ClassifiedIntent::chat();
        }

        let command = VoiceCommand::PRIORITY.into_iter().find(|command| {
            command
                .keywords()
                .iter()
                .any(|keyword| keyword_hits(&text, *command, keyword))
        });

        ClassifiedIntent { command }
    }
}

fn keyword_hits(text: &str, command: VoiceCommand, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, matched)| {
        !(command == VoiceCommand::Appointment
            && keyword == "doctor"
            && inside_listing_phrase(text, start, start + matched.len()))
    })
}

/// Whether `start..end` lies within an occurrence of a doctor-listing phrase
fn inside_listing_phrase(text: &str, start: usize, end: usize) -> bool {
    VoiceCommand::Doctors.keywords().iter().any(|phrase| {
        text.match_indices(phrase)
            .any(|(at, matched)| at <= start && end <= at + matched.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_appointment_keywords() {
        let intent = IntentClassifier::classify("I want to book an appointment");
        assert_eq!(intent.tag(), "VOICE_COMMAND:APPOINTMENT");
        assert!(intent.detected());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            IntentClassifier::classify("BOOK an appointment"),
            IntentClassifier::classify("book an appointment"),
        );
    }

    #[test]
    fn test_priority_pins_appointment_before_profile() {
        let intent = IntentClassifier::classify("book my profile appointment");
        assert_eq!(intent.command, Some(VoiceCommand::Appointment));
    }

    #[test]
    fn test_show_doctors_is_not_swallowed_by_doctor() {
        let intent = IntentClassifier::classify("show doctors");
        assert_eq!(intent.tag(), "VOICE_COMMAND:DOCTORS");
    }

    #[test]
    fn test_bare_doctor_is_appointment() {
        let intent = IntentClassifier::classify("I need a doctor, please");
        assert_eq!(intent.command, Some(VoiceCommand::Appointment));
    }

    #[test]
    fn test_each_bucket() {
        let cases = [
            ("please run a skin check", VoiceCommand::FaceAnalysis),
            ("how is my hair health", VoiceCommand::HairAnalysis),
            ("open my records", VoiceCommand::MedicalRecords),
            ("list doctors near me", VoiceCommand::Doctors),
            ("update my account", VoiceCommand::Profile),
        ];
        for (message, expected) in cases {
            assert_eq!(IntentClassifier::classify(message).command, Some(expected), "{}", message);
        }
    }

    #[test]
    fn test_inflected_keywords_still_match() {
        let cases = [
            ("I need doctors", VoiceCommand::Appointment),
            ("can I reschedule", VoiceCommand::Appointment),
            ("my appointments for May", VoiceCommand::Appointment),
            ("update my profiles", VoiceCommand::Profile),
            ("link my accounts", VoiceCommand::Profile),
        ];
        for (message, expected) in cases {
            assert_eq!(IntentClassifier::classify(message).command, Some(expected), "{}", message);
        }
    }

    #[test]
    fn test_doctor_outside_listing_phrase_is_appointment() {
        assert_eq!(
            IntentClassifier::classify("show doctors so I can see a doctor").command,
            Some(VoiceCommand::Appointment)
        );
        assert_eq!(
            IntentClassifier::classify("show the doctors").command,
            Some(VoiceCommand::Appointment)
        );
        assert_eq!(
            IntentClassifier::classify("Available Doctors today?").command,
            Some(VoiceCommand::Doctors)
        );
    }

    #[test]
    fn test_no_match_is_chat() {
        let intent = IntentClassifier::classify("What's the weather like?");
        assert_eq!(intent.tag(), "CHAT");
        assert!(!intent.detected());
        assert_eq!(IntentClassifier::classify("").tag(), "CHAT");
        assert_eq!(IntentClassifier::classify("   ").tag(), "CHAT");
    }

    #[test]
    fn test_keyword_next_to_punctuation() {
        let intent = IntentClassifier::classify("Schedule, please!");
        assert_eq!(intent.command, Some(VoiceCommand::Appointment));
    }

    proptest! {
        #[test]
        fn classify_is_deterministic(message in ".{0,64}") {
            prop_assert_eq!(
                IntentClassifier::classify(&message),
                IntentClassifier::classify(&message)
            );
        }

        #[test]
        fn classify_ignores_ascii_case(message in "[a-zA-Z ]{0,48}") {
            prop_assert_eq!(
                IntentClassifier::classify(&message.to_uppercase()),
                IntentClassifier::classify(&message.to_lowercase())
            );
        }
    }
}
