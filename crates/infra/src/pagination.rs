#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// Clamp caller-supplied paging so a single request can't sweep the table.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        let d = Self::default();
        Self {
            limit: limit.unwrap_or(d.limit).clamp(1, 100),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_paging() {
        let p = LimitOffset::clamped(Some(10_000), Some(-5));
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);

        let p = LimitOffset::clamped(None, None);
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
    }
}
