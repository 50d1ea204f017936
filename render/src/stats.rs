use crate::models::{Message, Role, Usage};

/// Footer lines shown under an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageLines {
    pub prompt: String,
    pub completion: String,
    pub cost: String,
}

impl UsageLines {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.prompt.as_str(), self.completion.as_str(), self.cost.as_str()].into_iter()
    }
}

/// Only assistant messages with a non-zero prompt token count get a footer.
pub fn usage_lines(message: &Message) -> Option<UsageLines> {
    if message.role != Role::Assistant {
        return None;
    }
    let usage = message.usage.as_ref()?;
    match usage.tokens_prompt {
        Some(n) if n > 0 => Some(lines_for(usage)),
        _ => None,
    }
}

fn lines_for(usage: &Usage) -> UsageLines {
    UsageLines {
        prompt: format!("Prompt Tokens: {}", count_text(usage.tokens_prompt)),
        completion: format!("Completion Tokens: {}", count_text(usage.tokens_completion)),
        cost: format!("Total Cost: {}", cost_text(usage.total_cost)),
    }
}

fn count_text(count: Option<u64>) -> String {
    count.map_or_else(|| "N/A".to_string(), |n| n.to_string())
}

/// Dollar amount with six decimals, or `N/A`.
pub fn cost_text(cost: Option<f64>) -> String {
    match cost {
        Some(c) if c.is_finite() => format!("${c:.6}"),
        _ => "N/A".to_string(),
    }
}
