use crate::domain::recommendation::TradeAction;
use crate::error::UserInputError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteTradeRequest {
    pub recommendation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTradeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecuteTradeResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

pub fn parse_symbol(input: &str) -> Result<String, UserInputError> {
    let symbol = input.trim();
    if symbol.is_empty() {
        return Err(UserInputError::EmptySymbol);
    }
    Ok(symbol.to_string())
}

pub fn parse_quantity(input: &str) -> Result<u64, UserInputError> {
    match input.trim().parse::<u64>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(UserInputError::InvalidQuantity),
    }
}
