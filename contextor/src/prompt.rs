//! Prompt builder: fixed instruction block + full context + question.

/// Reply the model must give, verbatim, when the context has no answer.
pub const NOT_FOUND_REPLY: &str = "I cannot find the answer in the provided policy documents.";

/// Organisation named in the role framing when none is configured.
pub const DEFAULT_ORGANIZATION: &str = "Rutgers University Finance and Administration (UFA)";

/// Instruction template, parameterised by organisation name.
///
/// The output is deterministic: the same inputs always give the same prompt.
/// Context and question are inserted byte-for-byte, without trimming.
///
/// # Example
/// ```
/// use contextor::PromptTemplate;
///
/// let p = PromptTemplate::new("Acme Corp").build("Leave: 20 days.", "How much leave?");
/// assert!(p.contains("Acme Corp"));
/// assert!(p.contains("CONTEXT:\nLeave: 20 days.\n"));
/// assert!(p.ends_with("USER QUESTION:\nHow much leave?\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    organization: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ORGANIZATION)
    }
}

impl PromptTemplate {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Assembles the single prompt string sent to the completion service.
    pub fn build(&self, context: &str, query: &str) -> String {
        let org = &self.organization;
        let header = format!(
            "You are an expert AI assistant for {org}.\n\
             Your goal is to answer questions ACCURATELY using ONLY the provided context from {org} policy documents.\n\
             \n\
             INSTRUCTIONS:\n\
             1. Read the provided context carefully.\n\
             2. Answer the user's question strictly from the context.\n\
             3. When the answer is found, CITE the specific section or page number if the text provides one.\n\
             4. If the answer is NOT in the context, reply exactly: \"{NOT_FOUND_REPLY}\"\n\
             5. Keep a professional, helpful tone.\n\
             6. Give the answer DIRECTLY. No summaries, preambles or conversational filler (e.g. \"Based on the policy...\") unless needed for clarity.\n\
             \n"
        );

        let mut out = String::with_capacity(header.len() + context.len() + query.len() + 40);
        out.push_str(&header);
        out.push_str("CONTEXT:\n");
        out.push_str(context);
        out.push_str("\n\nUSER QUESTION:\n");
        out.push_str(query);
        out.push('\n');
        out
    }
}
