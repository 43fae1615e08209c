use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    domain::{ClassificationMethod, ClassificationResult},
    taxonomy::OTHER,
};

use super::LlmError;

/// Model label → internal category key. Anything else maps to `other`.
const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("心理咨询", "psychology"),
    ("企业管理", "management"),
    ("财务会计税务", "finance"),
    ("其他", OTHER),
];

/// Substring probes for replies that are not JSON, checked in order.
const FALLBACK_LABELS: &[(&str, &str)] = &[
    ("心理咨询", "psychology"),
    ("企业管理", "management"),
    ("财务会计税务", "finance"),
    ("财务", "finance"),
];

const FALLBACK_CONFIDENCE: f64 = 0.5;
const TEMPERATURE: f32 = 0.3;

pub fn build_prompt(title: &str, content: &str, max_chars: usize) -> String {
    let content = truncate_chars(content, max_chars);
    format!(
        r#"请阅读下面的文章，判断它属于哪一个类别。

文章标题: {title}

文章内容:
{content}

可选类别（只能选择一个）：
1. 心理咨询 - 心理健康、心理治疗、心理咨询、情绪管理等
2. 企业管理 - 企业管理、战略管理、团队建设、领导力等
3. 财务会计税务 - 会计、税务、财务、审计等
4. 其他 - 不属于以上任何类别

请只返回一个JSON对象，格式如下：
{{
    "category": "心理咨询/企业管理/财务会计税务/其他 之一",
    "confidence": 0.95,
    "reasoning": "一句话说明理由"
}}

confidence 取 0 到 1 之间的数值。"#
    )
}

/// Keeps at most `max_chars` characters, marking the cut with `...`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn build_request(model: String, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: "user".into(),
            content: prompt.to_string(),
        }],
        temperature: TEMPERATURE,
    }
}

pub async fn parse_response(response: Response) -> Result<String, LlmError> {
    let completion: ChatCompletionResponse = response.json().await?;
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::NoChoices)?;

    choice
        .message
        .and_then(|msg| msg.content)
        .ok_or(LlmError::EmptyContent)
}

/// Turns a free-form model reply into a result. A JSON object anywhere in
/// the reply wins; otherwise the category labels are searched as plain text
/// and the result is tagged as a fallback.
pub fn parse_reply(reply: &str, model: &str) -> ClassificationResult {
    if let Some(result) = parse_json_reply(reply, model) {
        return result;
    }

    let category = FALLBACK_LABELS
        .iter()
        .find(|(label, _)| reply.contains(label))
        .map_or(OTHER, |(_, key)| key);

    ClassificationResult::flat(
        category,
        FALLBACK_CONFIDENCE,
        ClassificationMethod::AiFallback {
            model: model.to_string(),
        },
    )
    .with_reasoning("Parsed from non-JSON response")
}

fn parse_json_reply(reply: &str, model: &str) -> Option<ClassificationResult> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = match serde_json::from_str(&reply[start..=end]) {
        Ok(value) => value,
        Err(err) => {
            warn!(target: "ai", error = %err, "failed to parse model reply as JSON");
            return None;
        }
    };
    let object = value.as_object()?;
    let label = object.get("category")?;

    let category = label
        .as_str()
        .and_then(|label| {
            CATEGORY_LABELS
                .iter()
                .find(|(known, _)| *known == label.trim())
                .map(|(_, key)| *key)
        })
        .unwrap_or(OTHER);
    let confidence = object
        .get("confidence")
        .and_then(parse_confidence)
        .unwrap_or(FALLBACK_CONFIDENCE);
    let reasoning = object
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(
        ClassificationResult::flat(
            category,
            confidence,
            ClassificationMethod::Ai {
                model: model.to_string(),
            },
        )
        .with_reasoning(reasoning),
    )
}

fn parse_confidence(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then(|| parsed.clamp(0.0, 1.0))
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_embedded_in_prose_is_extracted() {
        let reply = r#"分析如下： {"category":"心理咨询","confidence":0.92,"reasoning":"讨论焦虑症的治疗"} 以上。"#;
        let result = parse_reply(reply, "deepseek");
        assert_eq!(result.category, "psychology");
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.method.to_string(), "ai_deepseek");
        assert_eq!(result.reasoning.as_deref(), Some("讨论焦虑症的治疗"));
    }

    #[test]
    fn unknown_label_maps_to_other() {
        let result = parse_reply(r#"{"category":"体育","confidence":0.8}"#, "zhipu");
        assert_eq!(result.category, "other");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.method.to_string(), "ai_zhipu");
    }

    #[test]
    fn missing_or_invalid_confidence_defaults_to_half() {
        let missing = parse_reply(r#"{"category":"企业管理"}"#, "deepseek");
        assert_eq!(missing.category, "management");
        assert_eq!(missing.confidence, 0.5);

        let invalid = parse_reply(r#"{"category":"企业管理","confidence":"high"}"#, "deepseek");
        assert_eq!(invalid.confidence, 0.5);

        let stringly = parse_reply(r#"{"category":"企业管理","confidence":"0.75"}"#, "deepseek");
        assert_eq!(stringly.confidence, 0.75);
    }

    #[test]
    fn non_json_reply_uses_text_fallback_in_priority_order() {
        let result = parse_reply("这篇文章属于财务会计税务，也涉及企业管理", "deepseek");
        assert_eq!(result.category, "management");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.method.to_string(), "ai_deepseek_fallback");

        let finance = parse_reply("主要讲财务报表", "deepseek");
        assert_eq!(finance.category, "finance");

        let nothing = parse_reply("无法判断", "deepseek");
        assert_eq!(nothing.category, "other");
        assert_eq!(nothing.method.to_string(), "ai_deepseek_fallback");
    }

    #[test]
    fn broken_json_falls_back_to_text_search() {
        let result = parse_reply(r#"{"category": "心理咨询", confidence: }"#, "deepseek");
        assert_eq!(result.category, "psychology");
        assert_eq!(result.method.to_string(), "ai_deepseek_fallback");
    }

    #[test]
    fn json_without_category_falls_back() {
        let result = parse_reply(r#"{"label":"企业管理"}"#, "deepseek");
        assert_eq!(result.category, "management");
        assert_eq!(result.method.to_string(), "ai_deepseek_fallback");
    }

    #[test]
    fn prompt_truncates_long_content_with_marker() {
        let content = "字".repeat(10);
        let prompt = build_prompt("标题", &content, 4);
        assert!(prompt.contains("字字字字..."));
        assert!(!prompt.contains("字字字字字"));
        for label in ["心理咨询", "企业管理", "财务会计税务", "其他"] {
            assert!(prompt.contains(label));
        }

        let short = build_prompt("标题", "短文", 4);
        assert!(short.contains("短文\n"));
        assert!(!short.contains("短文..."));
    }
}
