/// A dashboard indicator and the wording of its spectrum bar.
///
/// `top` and `bottom` label the ends of the bar; `invert` marks indicators
/// where a higher value is the undesirable end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub name: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
    pub invert: bool,
}

/// Indicators shown by the dashboard, in tab order. Rows whose variable does
/// not match one of these names exactly are not served.
pub const INDICATORS: [Indicator; 7] = [
    Indicator {
        name: "Net Financial Position",
        top: "More sustainable",
        bottom: "Less sustainable",
        invert: false,
    },
    Indicator {
        name: "Financial Assets-to-Liabilities",
        top: "More sustainable",
        bottom: "Less sustainable",
        invert: false,
    },
    Indicator {
        name: "Assets-to-Liabilities",
        top: "More sustainable",
        bottom: "Less sustainable",
        invert: false,
    },
    Indicator {
        name: "Net Debt-to-Total Revenues",
        top: "Less sustainable",
        bottom: "More sustainable",
        invert: true,
    },
    Indicator {
        name: "Interest-to-Total Revenues",
        top: "Less flexible",
        bottom: "More flexible",
        invert: true,
    },
    Indicator {
        name: "Net Book-to-Cost of TCA",
        top: "Less flexible",
        bottom: "More flexible",
        invert: true,
    },
    Indicator {
        name: "Govt Transfers-to-Total Revenues",
        top: "More Vulnerable",
        bottom: "Less vulnerable",
        invert: false,
    },
];

impl Indicator {
    pub fn find(name: &str) -> Option<&'static Indicator> {
        INDICATORS.iter().find(|indicator| indicator.name == name)
    }

    pub fn is_indicator(name: &str) -> bool {
        Self::find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_exact_match() {
        assert!(Indicator::find("Net Financial Position").is_some());
        assert!(Indicator::find("net financial position").is_none());
        assert!(Indicator::find("Net Financial Position ").is_none());
    }

    #[test]
    fn test_inverted_indicators() {
        let inverted: Vec<_> = INDICATORS.iter().filter(|i| i.invert).map(|i| i.name).collect();
        assert_eq!(
            inverted,
            vec![
                "Net Debt-to-Total Revenues",
                "Interest-to-Total Revenues",
                "Net Book-to-Cost of TCA"
            ]
        );
    }
}
