//! Typed problems
//!
//! Blocks carry parameters and solutions as strings. A [`TypedProblem`]
//! works on concrete types instead; [`TypedHandler`] bridges the two by
//! wrapping values in a JSON object under the key `o`
//! (`{"o": 242}` / `{"o": [2, 11, 11]}`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{ProblemError, ProblemHandler};

/// A problem over concrete parameter and solution types.
pub trait TypedProblem: Send + Sync {
    type Parameters: DeserializeOwned;
    type Solution: Serialize + DeserializeOwned;

    /// Registry key.
    const ID: &'static str;

    /// Solve, or explain why the instance cannot be solved.
    fn solve(&self, parameters: Self::Parameters) -> Result<Self::Solution, String>;

    fn check(&self, parameters: &Self::Parameters, solution: &Self::Solution) -> bool;
}

#[derive(Serialize)]
struct Wrapped<'a, T> {
    o: &'a T,
}

#[derive(Deserialize)]
struct Unwrapped<T> {
    o: T,
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str::<Unwrapped<T>>(raw).map(|w| w.o)
}

/// Exposes a [`TypedProblem`] as a string-level [`ProblemHandler`].
#[derive(Debug, Clone, Default)]
pub struct TypedHandler<P> {
    problem: P,
}

impl<P: TypedProblem> TypedHandler<P> {
    pub fn new(problem: P) -> Self {
        Self { problem }
    }
}

impl<P: TypedProblem> ProblemHandler for TypedHandler<P> {
    fn id(&self) -> &str {
        P::ID
    }

    fn solve(&self, parameters: &str) -> Result<String, ProblemError> {
        let decoded = decode::<P::Parameters>(parameters).map_err(|e| {
            ProblemError::InvalidParameters {
                problem: P::ID.to_string(),
                reason: e.to_string(),
            }
        })?;

        let solution = self
            .problem
            .solve(decoded)
            .map_err(|reason| ProblemError::Unsolvable {
                problem: P::ID.to_string(),
                reason,
            })?;

        serde_json::to_string(&Wrapped { o: &solution }).map_err(|e| ProblemError::Unsolvable {
            problem: P::ID.to_string(),
            reason: e.to_string(),
        })
    }

    fn check(&self, parameters: &str, solution: &str) -> bool {
        match (
            decode::<P::Parameters>(parameters),
            decode::<P::Solution>(solution),
        ) {
            (Ok(parameters), Ok(solution)) => self.problem.check(&parameters, &solution),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;

    impl TypedProblem for Double {
        type Parameters = i64;
        type Solution = i64;
        const ID: &'static str = "double";

        fn solve(&self, parameters: i64) -> Result<i64, String> {
            parameters.checked_mul(2).ok_or_else(|| "overflow".to_string())
        }

        fn check(&self, parameters: &i64, solution: &i64) -> bool {
            parameters.checked_mul(2) == Some(*solution)
        }
    }

    #[test]
    fn test_wraps_values_under_o() {
        let handler = TypedHandler::new(Double);

        assert_eq!(handler.id(), "double");
        assert_eq!(handler.solve(r#"{"o":21}"#).unwrap(), r#"{"o":42}"#);
        assert!(handler.check(r#"{"o":21}"#, r#"{"o":42}"#));
        assert!(handler.check(r#"{ "o": 21 }"#, r#"{"o":42}"#));
        assert!(!handler.check(r#"{"o":21}"#, r#"{"o":41}"#));
    }

    #[test]
    fn test_undecodable_input() {
        let handler = TypedHandler::new(Double);

        assert!(matches!(
            handler.solve("21"),
            Err(ProblemError::InvalidParameters { .. })
        ));
        assert!(!handler.check("garbage", r#"{"o":42}"#));
        assert!(!handler.check(r#"{"o":21}"#, r#"{"x":42}"#));
    }

    #[test]
    fn test_unsolvable_instance() {
        let handler = TypedHandler::new(Double);

        assert!(matches!(
            handler.solve(&format!(r#"{{"o":{}}}"#, i64::MAX)),
            Err(ProblemError::Unsolvable { .. })
        ));
    }
}
