//! Static language tables: keywords, price sources and built-in functions.
//!
//! Table order is the order the catalog and the completion list present them in.

use crate::domain::dsl::snippet::Snippet;

/// Timeframe argument assumed when an optional timeframe is left out.
pub const DEFAULT_TIMEFRAME: &str = "\"1d\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    /// Placeholder text inserted by the snippet.
    pub default: &'static str,
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub params: &'static [Param],
    pub description: &'static str,
}

impl BuiltinFunction {
    /// Call form shown to users, e.g. `SMA(series, length, timeframe?)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                if p.optional {
                    format!("{}?", p.name)
                } else {
                    p.name.to_string()
                }
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    pub fn snippet(&self) -> Snippet {
        Snippet::call(self.name, self.params.iter().map(|p| p.default))
    }
}

const fn req(name: &'static str, default: &'static str) -> Param {
    Param {
        name,
        default,
        optional: false,
    }
}

const fn opt(name: &'static str, default: &'static str) -> Param {
    Param {
        name,
        default,
        optional: true,
    }
}

const TF: Param = req("timeframe", DEFAULT_TIMEFRAME);
const TF_OPT: Param = opt("timeframe", DEFAULT_TIMEFRAME);
const SERIES: Param = req("series", "close");
const LENGTH: Param = req("length", "14");

pub const KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "AND",
        usage: "a AND b",
        description: "True when both conditions are true.",
    },
    Keyword {
        name: "OR",
        usage: "a OR b",
        description: "True when either condition is true.",
    },
    Keyword {
        name: "NOT",
        usage: "NOT a",
        description: "Negates a condition.",
    },
    Keyword {
        name: "CROSSES_ABOVE",
        usage: "a CROSSES_ABOVE b",
        description: "a was at or below b on the previous bar and is above it now.",
    },
    Keyword {
        name: "CROSSES_BELOW",
        usage: "a CROSSES_BELOW b",
        description: "a was at or above b on the previous bar and is below it now.",
    },
    Keyword {
        name: "CROSSING_ABOVE",
        usage: "a CROSSING_ABOVE b",
        description: "Alias of CROSSES_ABOVE.",
    },
    Keyword {
        name: "CROSSING_BELOW",
        usage: "a CROSSING_BELOW b",
        description: "Alias of CROSSES_BELOW.",
    },
    Keyword {
        name: "MOVING_UP",
        usage: "a MOVING_UP pct",
        description: "a rose by at least pct percent since the previous bar.",
    },
    Keyword {
        name: "MOVING_DOWN",
        usage: "a MOVING_DOWN pct",
        description: "a fell by at least pct percent since the previous bar.",
    },
    Keyword {
        name: "BETWEEN",
        usage: "a BETWEEN low AND high",
        description: "low <= a <= high.",
    },
];

pub const SOURCES: &[Source] = &[
    Source {
        name: "open",
        description: "Bar open price.",
    },
    Source {
        name: "high",
        description: "Bar high price.",
    },
    Source {
        name: "low",
        description: "Bar low price.",
    },
    Source {
        name: "close",
        description: "Bar close price.",
    },
    Source {
        name: "volume",
        description: "Bar traded volume.",
    },
    Source {
        name: "hlc3",
        description: "Typical price, (high + low + close) / 3.",
    },
];

pub const BUILTIN_FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "OPEN",
        params: &[TF],
        description: "Open price on the given timeframe.",
    },
    BuiltinFunction {
        name: "HIGH",
        params: &[TF],
        description: "High price on the given timeframe.",
    },
    BuiltinFunction {
        name: "LOW",
        params: &[TF],
        description: "Low price on the given timeframe.",
    },
    BuiltinFunction {
        name: "CLOSE",
        params: &[TF],
        description: "Close price on the given timeframe.",
    },
    BuiltinFunction {
        name: "VOLUME",
        params: &[TF],
        description: "Traded volume on the given timeframe.",
    },
    BuiltinFunction {
        name: "PRICE",
        params: &[TF],
        description: "Last traded price on the given timeframe.",
    },
    BuiltinFunction {
        name: "SMA",
        params: &[SERIES, LENGTH, TF_OPT],
        description: "Simple moving average. Timeframe defaults to daily.",
    },
    BuiltinFunction {
        name: "EMA",
        params: &[SERIES, LENGTH, TF_OPT],
        description: "Exponential moving average. Timeframe defaults to daily.",
    },
    BuiltinFunction {
        name: "RSI",
        params: &[SERIES, LENGTH, TF_OPT],
        description: "Relative strength index (0-100). Timeframe defaults to daily.",
    },
    BuiltinFunction {
        name: "STDDEV",
        params: &[SERIES, LENGTH, TF_OPT],
        description: "Rolling standard deviation. Timeframe defaults to daily.",
    },
    BuiltinFunction {
        name: "ATR",
        params: &[LENGTH, TF],
        description: "Average true range.",
    },
    BuiltinFunction {
        name: "RET",
        params: &[SERIES, TF],
        description: "Percent return of the series over one bar of the timeframe.",
    },
    BuiltinFunction {
        name: "ROC",
        params: &[SERIES, LENGTH],
        description: "Rate of change over length bars, in percent.",
    },
    BuiltinFunction {
        name: "OBV",
        params: &[req("price", "close"), req("volume", "volume"), TF],
        description: "On-balance volume.",
    },
    BuiltinFunction {
        name: "VWAP",
        params: &[req("price", "hlc3"), req("volume", "volume"), TF],
        description: "Volume-weighted average price.",
    },
    BuiltinFunction {
        name: "ABS",
        params: &[req("x", "x")],
        description: "Absolute value.",
    },
    BuiltinFunction {
        name: "SQRT",
        params: &[req("x", "x")],
        description: "Square root.",
    },
    BuiltinFunction {
        name: "LOG",
        params: &[req("x", "x")],
        description: "Natural logarithm.",
    },
    BuiltinFunction {
        name: "EXP",
        params: &[req("x", "x")],
        description: "e raised to x.",
    },
    BuiltinFunction {
        name: "POW",
        params: &[req("x", "x"), req("y", "2")],
        description: "x raised to the power y.",
    },
    BuiltinFunction {
        name: "LAG",
        params: &[SERIES, req("bars", "1")],
        description: "Value of the series the given number of bars ago.",
    },
    BuiltinFunction {
        name: "Z_SCORE",
        params: &[SERIES, req("length", "20")],
        description: "Distance from the rolling mean in standard deviations.",
    },
    BuiltinFunction {
        name: "BOLLINGER",
        params: &[SERIES, req("length", "20"), req("mult", "2")],
        description: "Bollinger band position of the series.",
    },
    BuiltinFunction {
        name: "CROSSOVER",
        params: &[req("a", "a"), req("b", "b")],
        description: "True on the bar where a crosses above b.",
    },
    BuiltinFunction {
        name: "CROSSUNDER",
        params: &[req("a", "a"), req("b", "b")],
        description: "True on the bar where a crosses below b.",
    },
    BuiltinFunction {
        name: "MAX",
        params: &[SERIES, LENGTH, TF],
        description: "Highest value over the window.",
    },
    BuiltinFunction {
        name: "MIN",
        params: &[SERIES, LENGTH, TF],
        description: "Lowest value over the window.",
    },
    BuiltinFunction {
        name: "AVG",
        params: &[SERIES, LENGTH, TF],
        description: "Mean value over the window.",
    },
    BuiltinFunction {
        name: "SUM",
        params: &[SERIES, LENGTH, TF],
        description: "Sum over the window.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn find_function(name: &str) -> Option<&'static BuiltinFunction> {
        BUILTIN_FUNCTIONS.iter().find(|f| f.name == name)
    }

    fn is_keyword(word: &str) -> bool {
        KEYWORDS.iter().any(|k| k.name == word)
    }

    #[test]
    fn table_names_are_unique() {
        let names: HashSet<_> = BUILTIN_FUNCTIONS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), BUILTIN_FUNCTIONS.len());
        let kw: HashSet<_> = KEYWORDS.iter().map(|k| k.name).collect();
        assert_eq!(kw.len(), KEYWORDS.len());
    }

    #[test]
    fn required_builtins_present() {
        for name in [
            "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME", "PRICE", "SMA", "EMA", "RSI", "STDDEV",
            "ATR", "RET", "ROC", "OBV", "VWAP", "ABS", "SQRT", "LOG", "EXP", "POW", "LAG",
            "Z_SCORE", "BOLLINGER", "CROSSOVER", "CROSSUNDER", "MAX", "MIN", "AVG", "SUM",
        ] {
            assert!(find_function(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn sma_signature_marks_optional_timeframe() {
        let sma = find_function("SMA").unwrap();
        assert_eq!(sma.signature(), "SMA(series, length, timeframe?)");
        assert_eq!(
            sma.snippet().to_editor_syntax(),
            "SMA(${1:close}, ${2:14}, ${3:\"1d\"})"
        );
    }

    #[test]
    fn atr_takes_length_and_timeframe() {
        let atr = find_function("ATR").unwrap();
        assert_eq!(atr.signature(), "ATR(length, timeframe)");
        assert_eq!(atr.snippet().placeholder_indices(), vec![1, 2]);
    }

    #[test]
    fn keywords_include_aliases() {
        assert!(is_keyword("CROSSING_ABOVE"));
        assert!(is_keyword("CROSSING_BELOW"));
        assert!(is_keyword("BETWEEN"));
        assert!(!is_keyword("SMA"));
    }

    #[test]
    fn sources_include_hlc3() {
        let names: Vec<_> = SOURCES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["open", "high", "low", "close", "volume", "hlc3"]);
    }
}
