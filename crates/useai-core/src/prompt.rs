//! Prompt construction
//!
//! The prompt is a pure function of the function text and the merged
//! metadata: identical inputs always yield byte-identical prompts.

use useai_directive::Metadata;

/// Error message generated code must throw when intent cannot be inferred
pub const UNINFERABLE_MESSAGE: &str = "use-ai: Unable to infer function purpose";

const SHAPE_EXAMPLES: &str = "\
Examples for each kind of function:

1. Function declaration:
   function sum(x, y) { ... }
   Body: return x + y;

2. Function expression:
   const sum = function (x, y) { ... }
   Body: return x + y;

3. Arrow function:
   const sum = (x, y) => { ... }
   Body: return x + y;

4. Object method:
   { sum(x, y) { ... } }
   Body: return x + y;

5. Function with no return value:
   function notify(message) { ... }
   Body: window.alert(message);";

/// Build the generation prompt
#[must_use]
pub fn build_prompt(function_text: &str, metadata: &Metadata) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("You are a code generator. Write the body of this function:\n\n");
    prompt.push_str(function_text.trim());
    prompt.push_str("\n\n");

    prompt.push_str("Requirements:\n");
    prompt.push_str("- Implement exactly the declared name, parameters and types; nothing else\n");
    prompt.push_str(
        "- Take the purpose from the function name. When there is no name, or it says \
         nothing, infer it from the parameters, types and instructions\n",
    );
    prompt.push_str(&format!(
        "  - When the purpose cannot be inferred, throw an Error with the message \"{UNINFERABLE_MESSAGE}\"\n"
    ));
    prompt.push_str("- Every function that returns a value must use a 'return' statement\n");
    prompt.push_str("- No side effects beyond what the name implies\n");
    prompt.push_str("- Valid TypeScript/JavaScript\n");
    prompt.push_str("- No comments and no console or debugging output\n");

    if let Some(instructions) = metadata.instructions.as_deref().filter(|i| !i.trim().is_empty()) {
        prompt.push_str("\nAdditional instructions: ");
        prompt.push_str(instructions);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nOutput only the statements of the body: no surrounding braces, no function header, \
         no explanation. Do not wrap the code in markdown fences.\n\n",
    );
    prompt.push_str(SHAPE_EXAMPLES);
    prompt.push_str("\n\nIMPORTANT: a function that returns a value MUST contain a 'return' statement.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: &str = "function add(a: number, b: number): number";

    #[test]
    fn deterministic() {
        let m = Metadata::new().with_temperature(0.2).with_instructions("be exact");
        assert_eq!(build_prompt(SIG, &m), build_prompt(SIG, &m));
    }

    #[test]
    fn contains_function_text_and_rules() {
        let prompt = build_prompt(SIG, &Metadata::new());
        assert!(prompt.contains(SIG));
        assert!(prompt.contains(UNINFERABLE_MESSAGE));
        assert!(prompt.contains("markdown fences"));
        assert!(prompt.contains("Arrow function"));
        assert!(prompt.contains("Object method"));
        assert!(!prompt.contains("Additional instructions"));
    }

    #[test]
    fn instructions_appended_verbatim() {
        let m = Metadata::new().with_instructions("Support USD, EUR, and GBP.");
        let prompt = build_prompt(SIG, &m);
        assert!(prompt.contains("Additional instructions: Support USD, EUR, and GBP.\n"));
    }

    #[test]
    fn sampling_options_do_not_change_prompt() {
        let a = build_prompt(SIG, &Metadata::new().with_temperature(0.1));
        let b = build_prompt(SIG, &Metadata::new().with_seed(9_i64).with_model("x"));
        assert_eq!(a, b);
    }

    proptest::proptest! {
        #[test]
        fn prompt_embeds_inputs(name in "[a-z][a-zA-Z0-9]{0,20}", hint in "[A-Za-z ,.]{1,60}") {
            let signature = format!("function {name}(x: number): number");
            let m = Metadata::new().with_instructions(hint.clone());
            let prompt = build_prompt(&signature, &m);
            proptest::prop_assert!(prompt.contains(&signature));
            proptest::prop_assert_eq!(prompt.clone(), build_prompt(&signature, &m));
            if !hint.trim().is_empty() {
                proptest::prop_assert!(prompt.contains(hint.as_str()));
            }
        }
    }
}
