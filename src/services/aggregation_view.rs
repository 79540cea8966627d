//! 错误记录汇总视图 - 业务能力层
//!
//! 纯投影：按报关单号分组，不持有独立于记录序列的状态

use std::collections::HashMap;

use crate::models::record::ErrorRecord;

/// 同一报关单号下的错误记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationGroup<'a> {
    pub entry_number: &'a str,
    pub records: Vec<&'a ErrorRecord>,
}

impl AggregationGroup<'_> {
    pub fn size(&self) -> usize {
        self.records.len()
    }
}

/// 汇总视图
///
/// 分组键按首次出现顺序排列，组内顺序与输入一致。
#[derive(Debug, Clone)]
pub struct AggregationView<'a> {
    records: &'a [ErrorRecord],
    groups: Vec<AggregationGroup<'a>>,
}

impl<'a> AggregationView<'a> {
    pub fn new(records: &'a [ErrorRecord]) -> Self {
        Self {
            records,
            groups: Self::group(records),
        }
    }

    /// 按报关单号稳定分组
    pub fn group(records: &'a [ErrorRecord]) -> Vec<AggregationGroup<'a>> {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut groups: Vec<AggregationGroup<'a>> = Vec::new();

        for record in records {
            let key = record.entry_number.as_str();
            match index.get(key) {
                Some(&slot) => groups[slot].records.push(record),
                None => {
                    index.insert(key, groups.len());
                    groups.push(AggregationGroup {
                        entry_number: key,
                        records: vec![record],
                    });
                }
            }
        }

        groups
    }

    pub fn groups(&self) -> &[AggregationGroup<'a>] {
        &self.groups
    }

    /// 查找指定报关单号的分组
    pub fn get(&self, entry_number: &str) -> Option<&AggregationGroup<'a>> {
        self.groups.iter().find(|g| g.entry_number == entry_number)
    }

    pub fn keys(&self) -> Vec<&'a str> {
        self.groups.iter().map(|g| g.entry_number).collect()
    }

    /// 记录总数
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// 完整记录表（原始顺序）
    pub fn table(&self) -> &'a [ErrorRecord] {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn heading(&self) -> String {
        format!("Processed Errors (Total: {})", self.count())
    }

    /// 每组一行的摘要
    pub fn summary_lines(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| format!("Entry {}: {} errors", g.entry_number, g.size()))
            .collect()
    }

    /// 纯文本报告：标题、摘要和明细表
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.heading());
        out.push_str("\n\nSummary:\n");
        for line in self.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("\nError Code\tError Description\tFiler Code\tEntry Number\t7501 Line Number\n");
        for r in self.records {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                r.error_code, r.error_description, r.filer_code, r.entry_number, r.line_number_7501
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entry: &str, code: &str) -> ErrorRecord {
        ErrorRecord::new(code, "EXCESS DUTY CLAIMED", "GU6", entry, "25")
    }

    #[test]
    fn test_group_first_seen_order() {
        let records = vec![record("E1", "F551"), record("E2", "F552"), record("E1", "F553")];
        let view = AggregationView::new(&records);

        assert_eq!(view.keys(), vec!["E1", "E2"]);
        assert_eq!(view.get("E1").unwrap().size(), 2);
        assert_eq!(view.get("E2").unwrap().size(), 1);
        assert_eq!(view.count(), 3);

        let e1_codes: Vec<_> = view
            .get("E1")
            .unwrap()
            .records
            .iter()
            .map(|r| r.error_code.as_str())
            .collect();
        assert_eq!(e1_codes, vec!["F551", "F553"]);
    }

    #[test]
    fn test_group_is_a_partition() {
        let entries = ["B", "A", "B", "C", "A", "A", "D", "B"];
        let records: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| record(e, &format!("F{}", i)))
            .collect();
        let view = AggregationView::new(&records);

        let total: usize = view.groups().iter().map(|g| g.size()).sum();
        assert_eq!(total, records.len());
        assert_eq!(view.keys(), vec!["B", "A", "C", "D"]);

        // 每条记录恰好出现在一个分组中
        for r in &records {
            let hits = view
                .groups()
                .iter()
                .flat_map(|g| g.records.iter())
                .filter(|x| std::ptr::eq(**x, r))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_empty_records() {
        let view = AggregationView::new(&[]);
        assert!(view.is_empty());
        assert!(view.groups().is_empty());
        assert_eq!(view.heading(), "Processed Errors (Total: 0)");
    }

    #[test]
    fn test_summary_lines() {
        let records = vec![record("60061040", "F551"), record("60061040", "F552")];
        let view = AggregationView::new(&records);
        assert_eq!(view.summary_lines(), vec!["Entry 60061040: 2 errors"]);

        let text = view.render_text();
        assert!(text.starts_with("Processed Errors (Total: 2)"));
        assert!(text.contains("F552\tEXCESS DUTY CLAIMED\tGU6\t60061040\t25"));
    }
}
