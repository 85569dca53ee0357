use anyhow::Context;

use crate::args::{Configurable, Usage};

/// The `<year> <month>` positional arguments selecting a calendar month.
#[derive(Clone, Debug, Default)]
pub struct YearMonth {
    year: Option<i16>,
    month: Option<i8>,
}

impl YearMonth {
    /// Returns the year and month given, or an error naming whichever one
    /// is missing.
    pub fn get(&self) -> anyhow::Result<(i16, i8)> {
        let Some(year) = self.year else {
            anyhow::bail!("missing required <year> argument")
        };
        let Some(month) = self.month else {
            anyhow::bail!("missing required <month> argument")
        };
        Ok((year, month))
    }
}

impl Configurable for YearMonth {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        let lexopt::Arg::Value(ref mut v) = *arg else { return Ok(false) };
        let v = std::mem::take(v);
        let Some(v) = v.to_str() else {
            anyhow::bail!("positional argument `{v:?}` is not valid UTF-8")
        };
        if self.year.is_none() {
            let year: i16 = v
                .parse()
                .with_context(|| format!("invalid <year> `{v}`"))?;
            self.year = Some(year);
        } else if self.month.is_none() {
            let month: i8 = v
                .parse()
                .with_context(|| format!("invalid <month> `{v}`"))?;
            anyhow::ensure!(
                (1..=12).contains(&month),
                "invalid <month> `{month}`, must be between 1 and 12",
            );
            self.month = Some(month);
        } else {
            anyhow::bail!("unexpected extra positional argument `{v}`")
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const YEAR: Usage = Usage::arg(
            "<year>",
            "The four digit year, e.g., 2024.",
            r#"
The four digit year, e.g., 2024.
"#,
        );
        const MONTH: Usage = Usage::arg(
            "<month>",
            "The month number, from 1 (January) to 12 (December).",
            r#"
The month number, from 1 (January) to 12 (December).
"#,
        );
        &[YEAR, MONTH]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<(i16, i8)> {
        let mut ym = YearMonth::default();
        let mut p = lexopt::Parser::from_args(args.iter().copied());
        let mut rest = lexopt::Parser::from_args(Vec::<&str>::new());
        while let Some(mut arg) = p.next()? {
            if !ym.configure(&mut rest, &mut arg)? {
                anyhow::bail!("not a positional argument");
            }
        }
        ym.get()
    }

    #[test]
    fn year_then_month() {
        assert_eq!(parse(&["2024", "1"]).unwrap(), (2024, 1));
        assert_eq!(parse(&["2024", "12"]).unwrap(), (2024, 12));
    }

    #[test]
    fn errors() {
        insta::assert_snapshot!(
            parse(&["2024"]).unwrap_err(),
            @"missing required <month> argument",
        );
        insta::assert_snapshot!(
            parse(&[]).unwrap_err(),
            @"missing required <year> argument",
        );
        insta::assert_snapshot!(
            parse(&["2024", "13"]).unwrap_err(),
            @"invalid <month> `13`, must be between 1 and 12",
        );
        insta::assert_snapshot!(
            format!("{:#}", parse(&["twenty", "1"]).unwrap_err()),
            @"invalid <year> `twenty`: invalid digit found in string",
        );
        insta::assert_snapshot!(
            parse(&["2024", "1", "2"]).unwrap_err(),
            @"unexpected extra positional argument `2`",
        );
    }
}
