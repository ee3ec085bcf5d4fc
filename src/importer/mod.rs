// ==========================================
// 산후조리원 디렉터리 - 导入层
// ==========================================
// 职责: 后台批量导入 조리원 目录（CSV）
// ==========================================

pub mod center_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use center_importer::{CenterDirectoryImporter, ImportSummary};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, FileParser, RawRecord};
