pub mod document_get;
pub mod ocr_extract;
