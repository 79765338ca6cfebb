//! WebAssembly bindings for the game engine.
//!
//! The browser owns the think delay: after `submitMove` reports an
//! `OpponentThinking` event it sets a timer and passes the ticket JSON back to
//! `completeOpponentTurn`.

use wasm_bindgen::prelude::*;

use crate::actions::TurnTicket;
use crate::game::{GameEngine, THINK_DELAY};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    engine: GameEngine,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn parse_ticket(ticket_json: &str) -> Result<TurnTicket, JsValue> {
    serde_json::from_str(ticket_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid ticket JSON: {}", e)))
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game, optionally with a seeded opponent
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> WasmGame {
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(seed),
            None => GameEngine::new(),
        };
        WasmGame { engine }
    }

    /// Place the player's mark, returns events JSON
    #[wasm_bindgen(js_name = submitMove)]
    pub fn submit_move(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self
            .engine
            .submit_player_move(index)
            .map_err(|e| JsValue::from_str(&format!("Move failed: {}", e)))?;
        to_json(&events)
    }

    /// End the think delay for a ticket, returns events JSON
    #[wasm_bindgen(js_name = beginOpponentTurn)]
    pub fn begin_opponent_turn(&mut self, ticket_json: &str) -> Result<String, JsValue> {
        let ticket = parse_ticket(ticket_json)?;
        let events = self
            .engine
            .begin_opponent_turn(ticket)
            .map_err(|e| JsValue::from_str(&format!("Opponent turn failed: {}", e)))?;
        to_json(&events)
    }

    /// Place the opponent's mark for a ticket, returns events JSON
    #[wasm_bindgen(js_name = resolveOpponentMove)]
    pub fn resolve_opponent_move(&mut self, ticket_json: &str) -> Result<String, JsValue> {
        let ticket = parse_ticket(ticket_json)?;
        let events = self
            .engine
            .resolve_opponent_move(ticket)
            .map_err(|e| JsValue::from_str(&format!("Opponent move failed: {}", e)))?;
        to_json(&events)
    }

    /// Both opponent transitions in one call, returns events JSON
    #[wasm_bindgen(js_name = completeOpponentTurn)]
    pub fn complete_opponent_turn(&mut self, ticket_json: &str) -> Result<String, JsValue> {
        let ticket = parse_ticket(ticket_json)?;
        let events = self
            .engine
            .complete_opponent_turn(ticket)
            .map_err(|e| JsValue::from_str(&format!("Opponent move failed: {}", e)))?;
        to_json(&events)
    }

    /// Start over, returns events JSON
    pub fn restart(&mut self) -> Result<String, JsValue> {
        to_json(&self.engine.restart())
    }

    /// Current state as JSON (for rendering)
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.engine.snapshot())
    }

    /// Cells the player may pick
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self) -> Vec<u32> {
        self.engine.valid_moves().into_iter().map(|i| i as u32).collect()
    }

    #[wasm_bindgen(js_name = isOpponentThinking)]
    pub fn is_opponent_thinking(&self) -> bool {
        self.engine.is_opponent_thinking()
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Suggested think delay for the browser timer
    #[wasm_bindgen(js_name = getThinkDelayMs)]
    pub fn get_think_delay_ms(&self) -> u32 {
        THINK_DELAY.as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_json_round_trips_through_events() {
        let mut game = WasmGame::new(Some(3));
        let events = game.submit_move(4).unwrap();
        let events: serde_json::Value = serde_json::from_str(&events).unwrap();
        let ticket = events
            .as_array()
            .unwrap()
            .iter()
            .find_map(|e| e.get("OpponentThinking"))
            .map(|e| e["ticket"].to_string())
            .unwrap();

        game.complete_opponent_turn(&ticket).unwrap();
        assert!(!game.is_opponent_thinking());
        assert_eq!(game.get_valid_moves().len(), 7);
    }
}
