pub mod ai_processor;
pub mod document_pipeline;
pub mod llm;
pub mod pdf_extractor;
pub mod pipeline_error;
pub mod storage;
