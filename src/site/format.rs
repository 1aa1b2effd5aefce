//! Plain-text rendering of a snapshot for prompt inclusion

use super::WebContentSnapshot;
use std::fmt::Write;

/// Render the snapshot as a deterministic text block. `None` renders as the
/// empty string.
pub fn format_context(snapshot: Option<&WebContentSnapshot>) -> String {
    let Some(snap) = snapshot else {
        return String::new();
    };

    let service_names = snap
        .services
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    out.push_str("INFORMACIÓN ACTUAL DEL SITIO WEB:\n");
    let _ = writeln!(out, "- Título: {}", snap.title);
    let _ = writeln!(out, "- Descripción: {}", snap.description);
    let _ = writeln!(out, "- Mensaje principal: {}", snap.hero_text);
    let _ = writeln!(out, "- Servicios: {service_names}");
    let _ = writeln!(out, "- Tecnologías: {}", snap.technologies.join(", "));

    if !snap.services.is_empty() {
        out.push_str("\nDETALLES DE SERVICIOS:\n");
        for service in &snap.services {
            let _ = writeln!(out, "- {}: {}", service.name, service.description);
            let _ = writeln!(out, "  Características: {}", service.features.join(", "));
        }
    }

    out
}
