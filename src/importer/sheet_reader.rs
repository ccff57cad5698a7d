// ==========================================
// 电机来料检验数据服务 - 表格载荷读取
// ==========================================
// 输入: 单工作表 xlsx 的原始字节
// 输出: 按位置对齐的文本行（第 0 行为表头，原样保留）
// 说明:
// - 只读第一个工作表
// - 区域起点之前的空行/空列补齐，保证列下标与表格列号一致
// - 每行去掉尾部空单元格，行长度即"有值的列数"
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, DataType, Range, Reader, Xlsx};
use std::io::Cursor;

/// 读取载荷第一个工作表的全部行
pub fn read_sheet_rows(payload: &[u8]) -> ImportResult<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(payload))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoWorksheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows = range_to_rows(&range);

    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "工作表读取完成");
    Ok(rows)
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset as usize];
    for cells in range.rows() {
        let mut row: Vec<String> = vec![String::new(); col_offset as usize];
        row.extend(cells.iter().map(cell_text));

        while row.last().map(|c| c.is_empty()).unwrap_or(false) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}

/// 单元格转文本
///
/// - 整数值的浮点数去掉小数部分（10.0 -> "10"）
/// - 日期单元格统一为 YYYY-MM-DD
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}
