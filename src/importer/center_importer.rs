// ==========================================
// 산후조리원 디렉터리 - 조리원目录导入器
// ==========================================
// 流程: 解析 → 映射/校验 → 落库（单事务）
// 红线: 任意一行映射或写入失败，整个文件不落库
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser};
use crate::repository::center_import_repo::{CenterImportRepository, ImportCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// 导入结果汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_path: String,
    pub imported_at: DateTime<Utc>,
    /// 非空白数据行数
    pub total_rows: usize,
    pub counts: ImportCounts,
    pub elapsed_ms: u64,
}

// ==========================================
// CenterDirectoryImporter
// ==========================================
pub struct CenterDirectoryImporter {
    import_repo: CenterImportRepository,
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl CenterDirectoryImporter {
    pub fn new(import_repo: CenterImportRepository) -> Self {
        Self::with_parser(import_repo, Box::new(CsvParser))
    }

    pub fn with_parser(import_repo: CenterImportRepository, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            import_repo,
            file_parser,
            field_mapper: FieldMapper,
        }
    }

    /// 从 CSV 文件导入 조리원 目录
    ///
    /// # 返回
    /// - Ok(ImportSummary): 批次信息与各表新建数量
    /// - Err(UnsupportedFormat / FileNotFound / MissingField / InvalidValue / Repository)
    #[instrument(skip(self, file_path), fields(batch_id))]
    pub fn import_from_csv<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path = file_path.as_ref();
        info!(batch_id = %batch_id, file_path = %path.display(), "开始导入 조리원 目录");

        // === 步骤 1: 解析文件 ===
        let raw_records = self.file_parser.parse_to_raw_records(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_records.len();
        debug!(total_rows, "文件解析完成");

        // === 步骤 2: 字段映射 ===
        let rows = raw_records
            .iter()
            .map(|record| self.field_mapper.map_to_import_row(record))
            .collect::<ImportResult<Vec<_>>>()
            .map_err(|e| {
                error!(error = %e, "字段映射失败");
                e
            })?;

        // === 步骤 3: 落库 ===
        let counts = self.import_repo.import_rows(&rows)?;

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            total_rows,
            centers = counts.centers_created,
            policies = counts.policies_created,
            elapsed_ms,
            "조리원 目录导入完成"
        );

        Ok(ImportSummary {
            batch_id,
            file_path: path.display().to_string(),
            imported_at: Utc::now(),
            total_rows,
            counts,
            elapsed_ms,
        })
    }
}
