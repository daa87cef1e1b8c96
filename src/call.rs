//! Call wrapper that turns every outcome of a network call into a [`Response`].

use std::future::Future;

use log::{debug, error, warn};
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::http::classify;
use crate::response::Response;

/// Code of the envelope returned when a call did not complete.
pub const NETWORK_BROKEN_STATUS: i32 = 1000;

/// Code a server uses to signal the session is no longer valid.
pub const SESSION_INVALID_STATUS: i32 = 401;

/// Runs `call` on a background task and returns its envelope.
///
/// `scope` is the unit of work the call belongs to; the operation receives a
/// clone of it. The returned future always resolves to a value:
///
/// - a failed or panicking operation yields [`Response::network_broken`];
/// - a [`SESSION_INVALID_STATUS`] envelope is logged, cancels `scope`, and is
///   still returned to the caller;
/// - if `scope` is cancelled before or while the call runs, the operation is
///   abandoned and [`Response::network_broken`] is returned;
/// - anything else is returned unchanged.
///
/// Dropping the returned future aborts the background task.
pub async fn api_call<T, F, Fut>(scope: &CancellationToken, call: F) -> Response<T>
where
    T: Send + 'static,
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = anyhow::Result<Response<T>>> + Send + 'static,
{
    if scope.is_cancelled() {
        debug!("Unit of work already cancelled, call not started");
        return Response::network_broken();
    }

    let mut task = AbortOnDropHandle::new(tokio::spawn(call(scope.clone())));

    let joined = tokio::select! {
        biased;
        _ = scope.cancelled() => {
            task.abort();
            debug!("Unit of work cancelled, call abandoned");
            return Response::network_broken();
        }
        joined = &mut task => joined,
    };

    let res = match joined {
        Ok(Ok(res)) => res,
        Ok(Err(e)) => {
            debug!("Call failed ({}): {:#}", classify(&e), e);
            return Response::network_broken();
        }
        Err(e) => {
            warn!("Call task did not complete: {}", e);
            return Response::network_broken();
        }
    };

    if res.code == SESSION_INVALID_STATUS {
        error!("SESSION_INVALID_STATUS");
        scope.cancel();
    }

    res
}
