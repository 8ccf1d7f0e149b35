pub mod query_directive;
pub mod query_translator;
pub mod result_assembler;
