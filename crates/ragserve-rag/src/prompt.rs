//! Fixed prompt template for grounded answering
//!
//! The template order is part of the service contract: instruction,
//! context block, question, answer cue.

/// Instruction restricting the model to the supplied context
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. \
Use ONLY the provided context to answer the question. \
Do NOT use external knowledge.";

/// Render the grounding prompt for a context block and question
pub fn render(context: &str, question: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nContext:\n{context}\n\nQuestion: {question}\n\nAnswer:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_section_order() {
        let prompt = render("Refunds are processed within 14 days.", "What is the refund policy?");

        let instruction_pos = prompt.find(SYSTEM_INSTRUCTION).unwrap();
        let context_pos = prompt.find("Context:\n").unwrap();
        let question_pos = prompt.find("Question: What is the refund policy?").unwrap();
        let answer_pos = prompt.find("Answer:").unwrap();

        assert!(instruction_pos < context_pos);
        assert!(context_pos < question_pos);
        assert!(question_pos < answer_pos);
    }

    #[test]
    fn test_prompt_contains_full_context() {
        let context = "chunk one\n\nchunk two";
        let prompt = render(context, "q");
        assert!(prompt.contains("Context:\nchunk one\n\nchunk two"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_instruction_forbids_outside_knowledge() {
        assert!(SYSTEM_INSTRUCTION.contains("ONLY the provided context"));
        assert!(SYSTEM_INSTRUCTION.contains("Do NOT use external knowledge"));
    }
}
