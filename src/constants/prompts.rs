// Field labels shared by the prompt templates and the response parser.
// They are case-sensitive and must keep the trailing colon.
pub const ANSWER_LABEL: &str = "ANSWER:";
pub const JUSTIFICATION_LABEL: &str = "JUSTIFICATION:";
pub const SOURCE_SNIPPET_LABEL: &str = "SOURCE_SNIPPET:";

pub const QUESTION_LABEL_PREFIX: &str = "QUESTION_";
pub const TYPE_LABEL_PREFIX: &str = "TYPE_";
pub const GUIDANCE_LABEL_PREFIX: &str = "GUIDANCE_";

pub const SCORE_LABEL: &str = "SCORE:";
pub const FEEDBACK_LABEL: &str = "FEEDBACK:";
pub const REFERENCE_LABEL: &str = "REFERENCE:";

pub const ASSISTANT_ROLE_INSTRUCTION: &str = "You are a GenAI assistant that analyzes user-uploaded documents. Your tasks are:

Answer Questions: Respond to user queries with accurate, concise answers that may require inference.

Ask Logic-Based Questions: Pose reasoning questions about the document and assess user responses.

Justify Every Answer: Support all answers and feedback with direct references from the document (quotes, sections, or page numbers).

Be clear, professional, and avoid assumptions not grounded in the text.";

pub const SUMMARY_INSTRUCTION: &str = "Focus on the main topics, key points, and overall purpose of the document.";

pub const ANSWER_FORMAT: &str = "Please provide your response in the following format:
ANSWER: [Your answer based on the document]
JUSTIFICATION: [Explain where in the document you found this information]
SOURCE_SNIPPET: [Quote the relevant portion from the document]";

pub const CHALLENGE_REQUIREMENTS: &str = "Requirements for questions:
1. Each question should require understanding of the document content
2. Questions should test different aspects: comprehension, analysis, inference
3. Avoid simple factual recall - focus on understanding and reasoning
4. Each question should have a clear connection to specific parts of the document";

pub const CHALLENGE_FORMAT: &str = "Please provide your response in the following format for each question:

QUESTION_1: [First challenging question]
TYPE_1: [comprehension/analysis/inference]
GUIDANCE_1: [Hint for answering this question]

QUESTION_2: [Second challenging question]
TYPE_2: [comprehension/analysis/inference]
GUIDANCE_2: [Hint for answering this question]

QUESTION_3: [Third challenging question]
TYPE_3: [comprehension/analysis/inference]
GUIDANCE_3: [Hint for answering this question]";

pub const EVALUATION_CRITERIA: &str = "Please evaluate the student's answer and provide:
1. A score from 0-100 based on accuracy and completeness
2. Constructive feedback explaining the score
3. Reference to specific parts of the document that support or contradict the answer
4. Suggestions for improvement if needed";

pub const EVALUATION_FORMAT: &str = "Provide your response in this format:
SCORE: [0-100]
FEEDBACK: [Detailed feedback on the answer quality]
JUSTIFICATION: [How the answer relates to the document content]
REFERENCE: [Specific part of document that's relevant]";

// Placeholders substituted when a completion cannot be scraped or the call fails.
pub const ANSWER_FALLBACK_JUSTIFICATION: &str = "Generated by AI based on document content";
pub const ANSWER_FALLBACK_SNIPPET: &str = "Full document context considered";
pub const EVALUATION_FALLBACK_JUSTIFICATION: &str = "Evaluated based on document content alignment";

pub const SUMMARY_UNAVAILABLE: &str =
    "Unable to generate summary. Please check your API key and try again.";
pub const ANSWER_ERROR_JUSTIFICATION: &str = "Error occurred during processing";
pub const EVALUATION_ERROR_JUSTIFICATION: &str = "Evaluation failed due to technical error";
pub const EVALUATION_ERROR_REFERENCE: &str = "Unable to provide reference";
