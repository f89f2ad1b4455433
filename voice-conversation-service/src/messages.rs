/// Fixed assistant texts
pub const APPOINTMENT_GUIDANCE: &str = "I can help you book an appointment. \
Here are our available doctors. Please choose a doctor and a time that works for you.";

pub const FACE_ANALYSIS_GUIDANCE: &str = "Let's start your face analysis. \
Please look straight at the camera in good lighting and hold still for a moment.";

pub const DOCTORS_GUIDANCE: &str = "Here are the doctors currently available. \
You can ask me to book an appointment with any of them.";

/// Apology used when a turn cannot be answered, keyed by language code
pub fn apology(language: &str) -> &'static str {
    let code = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match code.as_str() {
        "es" => "Lo siento, no pude procesar eso. ¿Podría repetirlo, por favor?",
        "fr" => "Désolé, je n'ai pas pu traiter cela. Pourriez-vous répéter, s'il vous plaît ?",
        "de" => "Entschuldigung, das konnte ich nicht verarbeiten. Könnten Sie das bitte wiederholen?",
        "ar" => "عذرًا، لم أتمكن من معالجة ذلك. هل يمكنك التكرار من فضلك؟",
        "hi" => "क्षमा करें, मैं इसे समझ नहीं पाया। क्या आप कृपया दोहरा सकते हैं?",
        _ => "I'm sorry, I couldn't process that. Could you please repeat?",
    }
}
