//! Timestamped record of moves played in the session.

use chrono::{DateTime, Local};

use crate::board::square::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    Human,
    Engine,
}

#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub ply: u32,
    pub mover: Mover,
    pub mv: Move,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mover: Mover, mv: Move) -> &MoveRecord {
        let ply = self.records.len() as u32 + 1;
        self.records.push(MoveRecord {
            ply,
            mover,
            mv,
            at: Local::now(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One line per ply: `3. human g1f3 (14:02:11)`.
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(|r| {
                let who = match r.mover {
                    Mover::Human => "human",
                    Mover::Engine => "engine",
                };
                format!("{}. {} {} ({})", r.ply, who, r.mv, r.at.format("%H:%M:%S"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveHistory, Mover};
    use crate::board::square::Move;

    #[test]
    fn records_plies_in_order() {
        let mut history = MoveHistory::new();
        assert!(history.is_empty());
        let e2e4 = Move::from_long_algebraic("e2e4").expect("e2e4 should parse");
        let e7e5 = Move::from_long_algebraic("e7e5").expect("e7e5 should parse");

        history.record(Mover::Human, e2e4);
        let second = history.record(Mover::Engine, e7e5);
        assert_eq!(second.ply, 2);

        let text = history.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. human e2e4 ("));
        assert!(lines[1].starts_with("2. engine e7e5 ("));
    }
}
