//! Z3 backend over 8-bit bit-vectors.
//!
//! Each query builds a fresh context, so the backend holds no solver state
//! between calls and can be shared across threads.

use crate::result::{Error, Result};
use crate::solver::{check_exclusions, Outcome, Solver, SolverConfig};
use armor_core::{BinaryOp, ConstraintSystem, Expr, BYTE_WIDTH};
use std::time::Instant;
use tracing::debug;
use z3::{
    ast::{Ast, Bool, BV},
    Config, Context, Params, SatResult,
};

/// SMT solver backend
#[derive(Debug, Clone, Default)]
pub struct Z3Solver {
    config: SolverConfig,
}

impl Z3Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

/// Encodes a term as a bit-vector of the byte width.
fn encode<'ctx>(ctx: &'ctx Context, vars: &[BV<'ctx>], expr: &Expr) -> BV<'ctx> {
    match expr {
        Expr::Var(index) => vars[*index].clone(),
        Expr::Const(value) => BV::from_u64(ctx, u64::from(*value), BYTE_WIDTH),
        Expr::Binary(op, lhs, rhs) => {
            let lhs = encode(ctx, vars, lhs);
            let rhs = encode(ctx, vars, rhs);
            match op {
                BinaryOp::Add => lhs.bvadd(&rhs),
                BinaryOp::Sub => lhs.bvsub(&rhs),
                BinaryOp::Mul => lhs.bvmul(&rhs),
                BinaryOp::Xor => lhs.bvxor(&rhs),
                BinaryOp::Or => lhs.bvor(&rhs),
                BinaryOp::And => lhs.bvand(&rhs),
            }
        }
        Expr::Shl(inner, amount) => {
            let amount = BV::from_u64(ctx, u64::from(*amount), BYTE_WIDTH);
            encode(ctx, vars, inner).bvshl(&amount)
        }
    }
}

impl Solver for Z3Solver {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn solve_with_exclusion(
        &self,
        system: &ConstraintSystem,
        excluded: &[&[u8]],
    ) -> Result<Outcome> {
        check_exclusions(system, excluded)?;
        self.config.cancel.check("z3 query")?;
        let start_time = Instant::now();

        let z3_config = Config::new();
        let ctx = Context::new(&z3_config);
        let solver = z3::Solver::new(&ctx);

        if let Some(timeout) = self.config.timeout {
            let mut params = Params::new(&ctx);
            let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
            params.set_u32("timeout", millis);
            solver.set_params(&params);
        }

        let vars: Vec<BV<'_>> = (0..system.size())
            .map(|i| BV::new_const(&ctx, format!("p[{i}]"), BYTE_WIDTH))
            .collect();

        for relation in system.relations() {
            let predicate = relation.predicate();
            let lhs = encode(&ctx, &vars, &predicate.lhs);
            let rhs = encode(&ctx, &vars, &predicate.rhs);
            solver.assert(&lhs._eq(&rhs));
        }

        for model in excluded {
            let differs: Vec<Bool<'_>> = vars
                .iter()
                .zip(model.iter())
                .map(|(var, &byte)| {
                    var._eq(&BV::from_u64(&ctx, u64::from(byte), BYTE_WIDTH))
                        .not()
                })
                .collect();
            let differs: Vec<&Bool<'_>> = differs.iter().collect();
            solver.assert(&Bool::or(&ctx, &differs));
        }

        let result = solver.check();
        debug!(
            relations = system.len(),
            excluded = excluded.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "z3 answered {result:?}"
        );

        match result {
            SatResult::Unsat => Ok(Outcome::Unsat),
            SatResult::Unknown => Err(Error::Cancelled(
                solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string()),
            )),
            SatResult::Sat => {
                let model = solver
                    .get_model()
                    .ok_or_else(|| Error::SolverInternal("sat without a model".to_string()))?;
                let bytes = vars
                    .iter()
                    .map(|var| {
                        model
                            .eval(var, true)
                            .and_then(|value| value.as_u64())
                            .and_then(|value| u8::try_from(value).ok())
                            .ok_or_else(|| {
                                Error::SolverInternal(format!("no byte value for {var}"))
                            })
                    })
                    .collect::<Result<Vec<u8>>>()?;
                Ok(Outcome::Model(bytes))
            }
        }
    }
}
