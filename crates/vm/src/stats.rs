//! Run statistics collection and reporting.
//!
//! This module tracks what a debugging session did. It provides:
//! 1. **Execution:** Instructions executed and host time.
//! 2. **Instruction mix:** Counts by family (move, arithmetic, divide, jump).
//! 3. **Branches:** Conditional jumps taken and not taken.
//! 4. **Replay:** Cursor moves that re-displayed history without executing.

use std::fmt::Write as _;
use std::time::Instant;

use crate::isa::{Family, Instruction};

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"branch"`, `"replay"`.
/// Pass an empty slice to [`RunStats::report_sections`] to include all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "branch", "replay"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

/// Counters for one session.
#[derive(Clone, Debug)]
pub struct RunStats {
    start_time: Instant,
    /// Instructions executed (halt included).
    pub instructions: u64,
    /// Move instructions executed.
    pub inst_move: u64,
    /// Add, subtract and multiply instructions executed.
    pub inst_arith: u64,
    /// Divide instructions executed.
    pub inst_div: u64,
    /// Unconditional jumps executed.
    pub inst_jump: u64,
    /// Conditional jumps whose condition held.
    pub branches_taken: u64,
    /// Conditional jumps that fell through.
    pub branches_not_taken: u64,
    /// Advances served from history.
    pub replay_forward: u64,
    /// Rewinds.
    pub replay_back: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions: 0,
            inst_move: 0,
            inst_arith: 0,
            inst_div: 0,
            inst_jump: 0,
            branches_taken: 0,
            branches_not_taken: 0,
            replay_forward: 0,
            replay_back: 0,
        }
    }
}

impl RunStats {
    /// Counts one executed instruction.
    ///
    /// # Arguments
    ///
    /// * `inst` - The instruction that ran.
    /// * `jumped` - Whether it redirected the program counter.
    pub const fn record(&mut self, inst: &Instruction, jumped: bool) {
        self.instructions += 1;
        match inst.opcode.family() {
            Family::Halt => {}
            Family::Move => self.inst_move += 1,
            Family::Add | Family::Sub | Family::Mul => self.inst_arith += 1,
            Family::DivMod => self.inst_div += 1,
            Family::Jump => self.inst_jump += 1,
            Family::Branch(_) if jumped => self.branches_taken += 1,
            Family::Branch(_) => self.branches_not_taken += 1,
        }
    }

    /// Builds a report of the requested sections.
    ///
    /// # Arguments
    ///
    /// * `sections` - Section names from [`STATS_SECTIONS`], or empty for all.
    pub fn report_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let total = self.instructions.max(1) as f64;
        let pct = |n: u64| (n as f64 / total) * 100.0;
        let mut out = String::new();

        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(out, "STEPVM RUN STATISTICS");
        let _ = writeln!(out, "{RULE}");
        if want("summary") {
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "vm_insts                 {}", self.instructions);
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, count) in [
                ("op.move", self.inst_move),
                ("op.arith", self.inst_arith),
                ("op.divmod", self.inst_div),
                ("op.jump", self.inst_jump),
                ("op.branch", self.branches_taken + self.branches_not_taken),
            ] {
                let _ = writeln!(out, "  {name:<22} {count} ({:.2}%)", pct(count));
            }
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("branch") {
            let branches = self.branches_taken + self.branches_not_taken;
            let rate = if branches > 0 {
                100.0 * (self.branches_taken as f64 / branches as f64)
            } else {
                0.0
            };
            let _ = writeln!(out, "BRANCHES");
            let _ = writeln!(out, "  br.taken               {}", self.branches_taken);
            let _ = writeln!(out, "  br.not_taken           {}", self.branches_not_taken);
            let _ = writeln!(out, "  br.taken_rate          {rate:.2}%");
            let _ = writeln!(out, "{THIN_RULE}");
        }
        if want("replay") {
            let _ = writeln!(out, "REPLAY");
            let _ = writeln!(out, "  replay.forward         {}", self.replay_forward);
            let _ = writeln!(out, "  replay.back            {}", self.replay_back);
        }
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        print!("{}", self.report_sections(&[]));
    }
}
