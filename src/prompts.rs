//! System prompt for sketch-to-render generation.
//!
//! Every prompt lives here so tests can inspect the composed text directly
//! without calling a real model. Callers can replace the instruction block via
//! [`crate::config::RenderConfig::system_prompt`]; the style fragment and user
//! details are always appended after it.

/// Default instruction block sent with every sketch.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert Industrial Design visualizer.
Your task is to take the provided rough sketch and transform it into a high-fidelity, photorealistic product rendering.

Input Image: A product sketch.
Goal: A professional portfolio-quality render.

Follow these strict rules:
1. Respect the form factor and perspective of the original sketch.
2. Apply realistic materials (plastic, metal, glass, fabric) as implied by the prompt or typical for this object.
3. Use professional studio lighting (soft box, rim lighting) to define the curves.
4. The background should be neutral or complementary to the product, keeping the focus on the design."#;

/// Compose the full text part of a generation request.
///
/// The style fragment and the user's details are inserted verbatim; an empty
/// `user_details` still produces the `Specific user requirements:` line.
pub fn compose_prompt(system_prompt: &str, style_fragment: &str, user_details: &str) -> String {
    format!(
        "{}\n\nStyle details: {}\nSpecific user requirements: {}",
        system_prompt.trim_end(),
        style_fragment,
        user_details
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::DesignStyle;

    #[test]
    fn default_prompt_carries_four_rules() {
        for rule in ["1. Respect", "2. Apply", "3. Use", "4. The background"] {
            assert!(DEFAULT_SYSTEM_PROMPT.contains(rule), "missing {rule}");
        }
    }

    #[test]
    fn composed_prompt_order() {
        let text = compose_prompt(
            DEFAULT_SYSTEM_PROMPT,
            DesignStyle::Cyberpunk.prompt_fragment(),
            "a desk lamp",
        );
        let rules = text.find("Follow these strict rules").unwrap();
        let style = text.find("Neon Lights, Dark Background").unwrap();
        let details = text.find("a desk lamp").unwrap();
        assert!(rules < style && style < details);
    }

    #[test]
    fn user_details_are_verbatim() {
        let details = "  brushed aluminium, 3 buttons\n\"matte\"  ";
        let text = compose_prompt("rules", DesignStyle::default().prompt_fragment(), details);
        assert!(text.ends_with(details));
    }
}
