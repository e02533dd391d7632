//! Signature expansion.
//!
//! TypeScript cannot express an optional parameter followed by a required
//! one. The schema can: `foo(a?, b)` means callers may pass `(a, b)` or just
//! `(b)`. Such "left-optional" parameters are resolved by emitting one
//! overload per subset of omitted positions, all-present first.
//!
//! Functions with an async callback get two families of overloads: the
//! promise form (callback removed, `Promise<T>` returned) followed by the
//! callback form (callback appended as a required trailing parameter).
//! Callback-only functions skip the promise family.
//!
//! Parameters are always cloned into the signature, never shared.

use extdts_common::RenderError;
use extdts_common::limits::MAX_LEFT_OPTIONAL;
use extdts_schema::{FunctionType, Property, RETURN_NAME, RefType, Type};
use smallvec::SmallVec;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    /// A synchronous function.
    Sync,
    /// The promise-returning form of an async function.
    Promise,
    /// The callback-taking form of an async function.
    Callback,
}

/// One concrete overload.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub kind: SignatureKind,
    pub parameters: Vec<Property>,
    /// Always named `return`.
    pub returns: Property,
}

/// Expand `func` (found at `path`) into its overloads.
pub fn expand(func: &FunctionType, path: &str) -> Result<Vec<Signature>, RenderError> {
    let params: Vec<&Property> = func.parameters.iter().filter(|p| !p.nodoc).collect();
    let mut out = Vec::new();

    match &func.async_callback {
        None => {
            let returns = match &func.returns {
                Some(ret) => ret.as_ref().clone(),
                None => Property::returns(Type::void()),
            };
            for parameters in omission_subsets(&params, path)? {
                out.push(Signature {
                    kind: SignatureKind::Sync,
                    parameters,
                    returns: returns.clone(),
                });
            }
        }
        Some(callback) => {
            let Type::Function(callback_fn) = &callback.ty else {
                return Err(RenderError::CallbackNotFunction {
                    path: path.to_string(),
                });
            };

            if !func.promise_unsupported {
                let returns = promise_return(callback_fn, path)?;
                for parameters in omission_subsets(&params, path)? {
                    out.push(Signature {
                        kind: SignatureKind::Promise,
                        parameters,
                        returns: returns.clone(),
                    });
                }
            }

            let mut required_callback = callback.as_ref().clone();
            required_callback.optional = false;
            let mut with_callback = params.clone();
            with_callback.push(&required_callback);
            for parameters in omission_subsets(&with_callback, path)? {
                out.push(Signature {
                    kind: SignatureKind::Callback,
                    parameters,
                    returns: Property::returns(Type::void()),
                });
            }
        }
    }

    if out.is_empty() {
        return Err(RenderError::NoExpansions {
            path: path.to_string(),
        });
    }
    for sig in &out {
        if sig.returns.name != RETURN_NAME {
            return Err(RenderError::ReturnName {
                path: path.to_string(),
                found: sig.returns.name.clone(),
            });
        }
    }
    trace!(path, signatures = out.len(), "expanded function");
    Ok(out)
}

/// Indices of optional parameters that have a required parameter somewhere
/// to their right.
pub fn left_optional_positions(params: &[&Property]) -> SmallVec<[usize; 4]> {
    let mut positions = SmallVec::new();
    let mut required_seen = false;
    for (index, param) in params.iter().enumerate().rev() {
        if !param.optional {
            required_seen = true;
        } else if required_seen {
            positions.push(index);
        }
    }
    positions.reverse();
    positions
}

/// Every parameter list obtained by omitting a subset of the left-optional
/// positions. Bit `j` of the mask omits the `j`-th left-optional position,
/// so mask 0 (nothing omitted) comes first.
fn omission_subsets(params: &[&Property], path: &str) -> Result<Vec<Vec<Property>>, RenderError> {
    let positions = left_optional_positions(params);
    if positions.len() > MAX_LEFT_OPTIONAL {
        return Err(RenderError::TooManyOptional {
            path: path.to_string(),
            count: positions.len(),
            limit: MAX_LEFT_OPTIONAL,
        });
    }

    let count = 1usize << positions.len();
    let mut lists = Vec::with_capacity(count);
    for mask in 0..count {
        let mut list = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            match positions.iter().position(|&p| p == index) {
                Some(bit) if mask & (1 << bit) != 0 => {}
                Some(_) => {
                    let mut required = (*param).clone();
                    required.optional = false;
                    list.push(required);
                }
                None => list.push((*param).clone()),
            }
        }
        lists.push(list);
    }
    Ok(lists)
}

/// `Promise<T>` where `T` is the callback's single argument, or `void`.
fn promise_return(callback: &FunctionType, path: &str) -> Result<Property, RenderError> {
    let args: Vec<&Property> = callback.parameters.iter().filter(|p| !p.nodoc).collect();
    let (resolved, description) = match args.as_slice() {
        [] => (Type::void(), None),
        [only] => (only.ty.clone(), only.description.clone()),
        many => {
            return Err(RenderError::AsyncArity {
                path: path.to_string(),
                count: many.len(),
            });
        }
    };
    let mut returns =
        Property::returns(Type::Ref(RefType::external("Promise").with_args(vec![resolved])));
    returns.description = description;
    Ok(returns)
}
