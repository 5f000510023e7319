//! Relative date labels for list views ("3mo ago", "Today").

use time::Date;

/// Human relative-age label for a past date, coarse on purpose: years, then
/// months, then days. Future dates and today both collapse to "Today".
pub fn relative_label(date: Date, today: Date) -> String {
    if date >= today {
        return "Today".to_string();
    }

    let years = today.year() - date.year();
    let months = i32::from(u8::from(today.month())) - i32::from(u8::from(date.month()));
    let days = i32::from(today.day()) - i32::from(date.day());

    let whole_years = if months < 0 || (months == 0 && days < 0) {
        years - 1
    } else {
        years
    };
    if whole_years > 0 {
        return format!("{whole_years}y ago");
    }

    let whole_months = {
        let raw = years * 12 + months;
        if days < 0 { raw - 1 } else { raw }
    };
    if whole_months > 0 {
        return format!("{whole_months}mo ago");
    }

    let elapsed = (today - date).whole_days();
    if elapsed > 0 {
        format!("{elapsed}d ago")
    } else {
        "Today".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn same_day_is_today() {
        assert_eq!(
            relative_label(date!(2025 - 06 - 01), date!(2025 - 06 - 01)),
            "Today"
        );
    }

    #[test]
    fn days_within_a_month() {
        assert_eq!(
            relative_label(date!(2025 - 06 - 01), date!(2025 - 06 - 11)),
            "10d ago"
        );
    }

    #[test]
    fn months_within_a_year() {
        assert_eq!(
            relative_label(date!(2025 - 01 - 15), date!(2025 - 06 - 11)),
            "4mo ago"
        );
    }

    #[test]
    fn years_round_down_until_anniversary() {
        assert_eq!(
            relative_label(date!(2023 - 09 - 14), date!(2025 - 06 - 11)),
            "1y ago"
        );
        assert_eq!(
            relative_label(date!(2023 - 09 - 14), date!(2025 - 09 - 14)),
            "2y ago"
        );
    }
}
