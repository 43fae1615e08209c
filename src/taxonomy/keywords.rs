use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Display name reported for the catch-all category.
pub const OTHER_DISPLAY_NAME: &str = "其他";

/// Flat single-level rule: a top-level category and its weighted keywords.
/// Weights lie in [0, 1]; order is kept for deterministic tie-breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub key: String,
    pub name: String,
    pub keywords: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRuleSet {
    rules: Vec<KeywordRule>,
}

impl KeywordRuleSet {
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self, CatalogError> {
        if rules.is_empty() {
            return Err(CatalogError::Empty("keyword rules"));
        }
        super::ensure_unique("keyword rule", rules.iter().map(|r| r.key.as_str()))?;
        for rule in &rules {
            if let Some((keyword, weight)) = rule
                .keywords
                .iter()
                .find(|(_, weight)| !(0.0..=1.0).contains(weight))
            {
                return Err(CatalogError::WeightOutOfRange {
                    category: rule.key.clone(),
                    keyword: keyword.clone(),
                    weight: *weight,
                });
            }
        }
        Ok(Self { rules })
    }

    pub(super) fn from_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self {
            rules: vec![
                rule(
                    "psychology",
                    "心理咨询",
                    &[
                        ("心理咨询", 1.0),
                        ("心理治疗", 1.0),
                        ("心理辅导", 1.0),
                        ("心理咨询师", 1.0),
                        ("抑郁症", 0.95),
                        ("焦虑症", 0.95),
                        ("强迫症", 0.95),
                        ("恐惧症", 0.95),
                        ("双相情感障碍", 0.95),
                        ("失眠症", 0.9),
                        ("心理障碍", 0.9),
                        ("认知行为疗法", 0.85),
                        ("精神分析", 0.85),
                        ("心理动力学", 0.8),
                        ("团体治疗", 0.8),
                        ("家庭治疗", 0.8),
                        ("艺术治疗", 0.75),
                        ("心理健康", 0.7),
                        ("情绪管理", 0.7),
                        ("压力缓解", 0.7),
                        ("心理问题", 0.7),
                        ("心理状态", 0.65),
                        ("心理", 0.5),
                        ("抑郁", 0.6),
                        ("焦虑", 0.6),
                        ("情绪", 0.5),
                    ],
                ),
                rule(
                    "management",
                    "企业管理",
                    &[
                        ("企业管理", 1.0),
                        ("管理学", 1.0),
                        ("CEO", 0.95),
                        ("总经理", 0.9),
                        ("高管", 0.85),
                        ("战略管理", 1.0),
                        ("企业战略", 0.95),
                        ("商业模式", 0.9),
                        ("竞争战略", 0.85),
                        ("战略规划", 0.85),
                        ("领导力", 0.95),
                        ("团队建设", 0.9),
                        ("领导艺术", 0.85),
                        ("执行力", 0.8),
                        ("人力资源管理", 0.9),
                        ("组织管理", 0.85),
                        ("绩效管理", 0.85),
                        ("企业文化", 0.8),
                        ("组织架构", 0.8),
                        ("员工激励", 0.75),
                        ("人才管理", 0.75),
                        ("团队协作", 0.7),
                        ("项目管理", 0.85),
                        ("运营管理", 0.8),
                        ("流程优化", 0.75),
                        ("效率提升", 0.7),
                        ("管理", 0.5),
                        ("团队", 0.5),
                        ("公司", 0.4),
                        ("企业", 0.4),
                    ],
                ),
                rule(
                    "finance",
                    "财务会计税务",
                    &[
                        ("会计", 1.0),
                        ("注册会计师", 1.0),
                        ("CPA", 0.95),
                        ("会计师", 0.9),
                        ("税务", 1.0),
                        ("税务筹划", 0.95),
                        ("报税", 0.9),
                        ("税收", 0.85),
                        ("增值税", 0.85),
                        ("企业所得税", 0.85),
                        ("个人所得税", 0.8),
                        ("税务申报", 0.8),
                        ("财务管理", 0.9),
                        ("财务分析", 0.85),
                        ("财务报表", 0.85),
                        ("财务总监", 0.85),
                        ("CFO", 0.85),
                        ("预算管理", 0.8),
                        ("财务会计", 0.9),
                        ("管理会计", 0.85),
                        ("成本会计", 0.8),
                        ("审计", 0.85),
                        ("内部审计", 0.8),
                        ("外部审计", 0.75),
                        ("会计准则", 0.8),
                        ("会计制度", 0.75),
                        ("会计核算", 0.75),
                        ("财务制度", 0.7),
                        ("资产负债表", 0.75),
                        ("利润表", 0.75),
                        ("现金流量表", 0.7),
                        ("应收账款", 0.65),
                        ("应付账款", 0.65),
                        ("成本核算", 0.7),
                        ("财务", 0.5),
                        ("账务", 0.5),
                        ("记账", 0.5),
                        ("核算", 0.5),
                    ],
                ),
            ],
        }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn rule(&self, key: &str) -> Option<&KeywordRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    /// Display name for a category key; `other` maps to [`OTHER_DISPLAY_NAME`]
    /// and unknown keys are echoed back.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(rule) = self.rule(key) {
            &rule.name
        } else if key == super::OTHER {
            OTHER_DISPLAY_NAME
        } else {
            key
        }
    }
}

fn rule(key: &str, name: &str, keywords: &[(&str, f64)]) -> KeywordRule {
    KeywordRule {
        key: key.to_string(),
        name: name.to_string(),
        keywords: keywords
            .iter()
            .map(|(kw, weight)| (kw.to_string(), *weight))
            .collect(),
    }
}

/// Keyword lists that flag content for exclusion, grouped by reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionGroup {
    pub reason: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionLists {
    groups: Vec<ExclusionGroup>,
}

impl ExclusionLists {
    pub fn new(groups: Vec<ExclusionGroup>) -> Self {
        Self { groups }
    }

    pub fn builtin() -> Self {
        Self {
            groups: vec![
                group(
                    "spam",
                    &[
                        "加微信", "联系QQ", "代写", "刷单", "贷款", "彩票", "博彩", "赌博",
                        "投资理财", "内幕消息", "涨停板", "股票推荐", "快速致富", "暴利",
                        "兼职刷单",
                    ],
                ),
                group(
                    "advertisement",
                    &[
                        "立即购买", "限时优惠", "促销", "折扣", "优惠券", "点击购买",
                        "免费试用", "专柜价", "原价", "现价",
                    ],
                ),
            ],
        }
    }

    pub fn groups(&self) -> &[ExclusionGroup] {
        &self.groups
    }

    /// Case-insensitive substring match of `title` and `content`; every hit
    /// is reported as `reason:keyword`, in list order.
    pub fn matches(&self, title: &str, content: &str) -> Vec<String> {
        let combined = format!("{title} {content}").to_lowercase();
        self.groups
            .iter()
            .flat_map(|group| {
                group
                    .keywords
                    .iter()
                    .filter(|keyword| combined.contains(&keyword.to_lowercase()))
                    .map(move |keyword| format!("{}:{}", group.reason, keyword))
            })
            .collect()
    }
}

fn group(reason: &str, keywords: &[&str]) -> ExclusionGroup {
    ExclusionGroup {
        reason: reason.to_string(),
        keywords: keywords.iter().map(|kw| kw.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_have_weights_in_range() {
        let rules = KeywordRuleSet::builtin();
        assert!(KeywordRuleSet::new(rules.rules().to_vec()).is_ok());
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let err = KeywordRuleSet::new(vec![rule("x", "X", &[("a", 1.5)])]).unwrap_err();
        assert!(matches!(err, CatalogError::WeightOutOfRange { weight, .. } if weight == 1.5));
    }

    #[test]
    fn display_name_falls_back() {
        let rules = KeywordRuleSet::builtin();
        assert_eq!(rules.display_name("finance"), "财务会计税务");
        assert_eq!(rules.display_name("other"), "其他");
        assert_eq!(rules.display_name("sports"), "sports");
    }

    #[test]
    fn exclusion_matches_report_reason_and_keyword() {
        let lists = ExclusionLists::builtin();
        let hits = lists.matches("", "加微信 联系QQ 代写");
        assert_eq!(hits, vec!["spam:加微信", "spam:联系QQ", "spam:代写"]);
    }

    #[test]
    fn exclusion_matching_ignores_case() {
        let lists = ExclusionLists::builtin();
        let hits = lists.matches("请联系qq", "");
        assert_eq!(hits, vec!["spam:联系QQ"]);
    }
}
