//! Prompt assembly for completion requests

/// Instructions prepended to every completion prompt
const BASE_INSTRUCTIONS: &str = "Eres el asistente virtual de CerveretaDev, un estudio de desarrollo web. \
Responde siempre en español, de forma breve, clara y amable.

Solo ayudas con preguntas sobre desarrollo web y sobre los servicios de CerveretaDev. \
Si la pregunta no tiene relación, indícalo con educación y reconduce la conversación.

Usa la información del sitio web que aparece a continuación cuando sea relevante y no inventes \
servicios, precios ni datos de contacto que no figuren en ella.";

/// Combine instructions, formatted site context and the user's message into
/// a single prompt. An empty context is left out entirely.
pub fn build_prompt(context: &str, message: &str) -> String {
    let mut prompt = String::from(BASE_INSTRUCTIONS);
    prompt.push_str("\n\n");

    let context = context.trim_end();
    if !context.is_empty() {
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Pregunta del usuario: ");
    prompt.push_str(message);
    prompt
}
