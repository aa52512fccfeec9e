//! # Default Task Prompts
//!
//! This module contains the fixed instruction blocks for the two model calls
//! the pipeline makes.

/// The literal placed between the texts of consecutive documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---DOCUMENT SEPARATOR---\n\n";

// --- Template Analysis ---

/// Asks the model to infer a nested JSON template from sample documents.
///
/// Placeholders: `{documents}`
pub const TEMPLATE_ANALYSIS_PROMPT: &str = r#"Analyze the following documents and create a comprehensive, structured template that captures all major sections, subsections, and key elements EXPLICITLY PRESENT in the documents (Which means not adding stuff). The template will be filled up with content by the user to for you to generate a new document similar to the sample documents.

Output the template as a nested JSON object. Follow these guidelines:
1. Use camelCase for all keys.
2. Group related items into objects or arrays as appropriate.
3. Use descriptive key names that reflect the content they represent.
4. For fields that require user input, use placeholder text in square brackets, e.g., "[Enter item description]".
5. Include all relevant sections and subsections found in the input documents.
6. Maintain a logical hierarchy that reflects the structure of procurement documents.

Provide only the JSON object without any additional text or explanation. Here are the document contents:

{documents}"#;

// --- Document Generation ---

/// Asks the model to write a complete document from a structure and user inputs.
///
/// Placeholders: `{structure}`, `{user_inputs}`
pub const DOCUMENT_GENERATION_PROMPT: &str = r#"Generate a full document based on the following structure and user inputs. Structure: {structure}. User Inputs: {user_inputs}. The generated document should maintain a professional tone and formatting consistent with the original structure."#;
