//! Prompt text and the output-shape description sent to the completion service.

use serde_json::{Value, json};

use crate::config::{FontOption, LogoConfig};
use crate::edit::Slider;

/// Instruction framing the model's role.
pub const SYSTEM_INSTRUCTION: &str = "You are a logo design assistant. \
You receive the current configuration of a wordmark logo as JSON and a change request. \
Respond with the complete updated configuration as JSON matching the response schema. \
Keep every field the request does not mention unchanged. \
Colors must be hex codes like #RRGGBB.";

/// Builds the user prompt: the current configuration followed by the request.
pub fn build_prompt(current: &LogoConfig, instruction: &str) -> Result<String, serde_json::Error> {
    let current_json = current.to_json_pretty()?;
    let fonts = FontOption::ALL
        .iter()
        .map(|f| format!("- {}", f.value()))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "Current logo configuration:\n{current_json}\n\n\
         Available font stacks (prefer one of these for fontFamily):\n{fonts}\n\n\
         Requested change: {instruction}"
    ))
}

/// Response schema in the OpenAPI subset the Gemini API accepts.
///
/// Slider ranges are given as descriptions rather than hard bounds; the model
/// may step outside them and the result is still accepted if finite.
pub fn response_schema() -> Value {
    let text = |description: &str| json!({ "type": "STRING", "description": description });
    let color = |description: &str| {
        json!({
            "type": "STRING",
            "description": format!("{description} Hex color code, e.g. #DC2626."),
        })
    };
    let number = |slider: Slider, description: &str| {
        let range = slider.range();
        json!({
            "type": "NUMBER",
            "description": format!(
                "{description} Typical range {} to {} in steps of {}.",
                range.min, range.max, range.step
            ),
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "textMain": text("Primary wordmark text."),
            "textSecondary": text("Secondary symbol drawn after the wordmark."),
            "textTagline": text("Tagline drawn below the wordmark."),
            "colorMain": color("Color of the first letter of textMain."),
            "colorMainRest": color("Color of the remaining letters of textMain."),
            "colorSecondary": color("Color of textSecondary."),
            "colorTagline": color("Color of the tagline."),
            "bgColor": color("Background color."),
            "fontFamily": text("CSS font-family stack used for all text."),
            "letterSpacingMain": number(Slider::LetterSpacingMain, "Letter spacing of textMain in em."),
            "letterSpacingTagline": number(Slider::LetterSpacingTagline, "Letter spacing of the tagline in em."),
            "gapSize": number(Slider::GapSize, "Horizontal gap between textMain and textSecondary in canvas units."),
        },
        "required": [
            "textMain", "textSecondary", "textTagline",
            "colorMain", "colorMainRest", "colorSecondary", "colorTagline", "bgColor",
            "fontFamily", "letterSpacingMain", "letterSpacingTagline", "gapSize"
        ],
        "propertyOrdering": [
            "textMain", "textSecondary", "textTagline",
            "colorMain", "colorMainRest", "colorSecondary", "colorTagline", "bgColor",
            "fontFamily", "letterSpacingMain", "letterSpacingTagline", "gapSize"
        ],
    })
}
