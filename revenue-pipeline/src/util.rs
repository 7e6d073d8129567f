use chrono::NaiveDate;

/// Last segment of a `::`-separated type path, used as a stage name in logs.
pub fn short_type_name(full: &str) -> &str {
    match full.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// Calendar month following `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Last day of the given month, `None` for an out-of-range month.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (y, m) = next_month(year, month);
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

/// `"Mar 2004"` style label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_module_path() {
        assert_eq!(
            short_type_name("revenue_pipeline::components::TopConfidenceSelector"),
            "TopConfidenceSelector"
        );
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn month_end_handles_leap_years_and_december() {
        assert_eq!(month_end(2004, 2), NaiveDate::from_ymd_opt(2004, 2, 29));
        assert_eq!(month_end(2003, 12), NaiveDate::from_ymd_opt(2003, 12, 31));
        assert_eq!(month_end(2003, 13), None);
        assert_eq!(month_end(2003, 0), None);
    }

    #[test]
    fn next_month_rolls_over_december_only() {
        assert_eq!(next_month(2003, 11), (2003, 12));
        assert_eq!(next_month(2003, 12), (2004, 1));
    }

    #[test]
    fn month_labels() {
        let a = NaiveDate::from_ymd_opt(2003, 11, 14).unwrap();
        assert_eq!(month_label(a), "Nov 2003");
    }
}
