// ==========================================
// 산후조리원 디렉터리 - 文件解析器
// ==========================================
// 支持: CSV (.csv)，首行为表头
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行（表头 → 去空白后的单元格）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 数据行号 = 文件行号 - 1（表头占第 1 行；空行与空白行也占行号）
    pub row_no: usize,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 读取单元格；缺列与空值都返回 None
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        let path = file_path;

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // csv 会直接跳过空行，行号取自记录在文件中的位置
            let row_no = record
                .position()
                .map(|pos| pos.line().saturating_sub(1) as usize)
                .unwrap_or(row_idx + 1);
            let mut fields = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord {
                row_no,
                fields,
            });
        }

        tracing::debug!(file = %path.display(), rows = records.len(), "CSV 解析完成");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(
            "region_first_layer,region_second_layer,region_third_layer,center\n\
             서울, 강남구 ,역삼동,행복조리원\n",
        );

        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row_no, 1);
        assert_eq!(records[0].get("region_second_layer"), Some("강남구"));
        assert_eq!(records[0].get("center"), Some("행복조리원"));
    }

    #[test]
    fn test_csv_parser_skips_blank_rows() {
        let file = csv_file("center,policies\n,\nA,\n");

        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        // 空白行仍占行号
        assert_eq!(records[0].row_no, 2);
        assert_eq!(records[0].get("policies"), None);
    }

    #[test]
    fn test_csv_parser_counts_empty_lines() {
        let file = csv_file("center,policies\nA,\n\nB,\n");

        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_no, 1);
        assert_eq!(records[1].row_no, 3);
    }

    #[test]
    fn test_csv_parser_rejects_other_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = CsvParser.parse_to_raw_records(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "xlsx"));
    }

    #[test]
    fn test_csv_parser_missing_file() {
        let result = CsvParser.parse_to_raw_records(Path::new("/nonexistent/centers.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
