//! 취소 가능한 작업 그룹.
//!
//! 한 단계의 fan-out 작업을 `JoinSet`으로 묶고, 첫 번째 실패에서 나머지 작업을 모두 취소합니다.
//! 각 작업은 그룹의 `CancellationToken`과 경쟁하므로, 취소 후에는 어떤 작업도 단계를 넘어 살아남지 않습니다.
//!
//! ```rust,ignore
//! let mut group = TaskGroup::new("descriptors", &shutdown, 8);
//! for ticker in tickers {
//!     let provider = provider.clone();
//!     group.spawn(move |_token| async move { provider.describe(&ticker).await });
//! }
//! let instruments = group.join_all().await?;
//! ```

use hedge_core::{HedgeError, HedgeResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 실패 시 형제 작업을 취소하는 작업 그룹.
pub struct TaskGroup<T> {
    stage: &'static str,
    tasks: JoinSet<HedgeResult<T>>,
    token: CancellationToken,
    limiter: Option<Arc<Semaphore>>,
    spawned: usize,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// `parent`의 하위 토큰으로 그룹을 만듭니다. `max_concurrency`가 0이면 제한 없음.
    pub fn new(stage: &'static str, parent: &CancellationToken, max_concurrency: usize) -> Self {
        Self {
            stage,
            tasks: JoinSet::new(),
            token: parent.child_token(),
            limiter: (max_concurrency > 0).then(|| Arc::new(Semaphore::new(max_concurrency))),
            spawned: 0,
        }
    }

    /// 그룹 취소 토큰.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn len(&self) -> usize {
        self.spawned
    }

    pub fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// 작업을 추가합니다. 클로저는 그룹 토큰을 받아 협력적 취소에 사용할 수 있습니다.
    pub fn spawn<F, Fut>(&mut self, make: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = HedgeResult<T>> + Send + 'static,
    {
        let token = self.token.clone();
        let limiter = self.limiter.clone();
        let unit = make(token.clone());

        self.tasks.spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => tokio::select! {
                    _ = token.cancelled() => return Err(HedgeError::Cancelled),
                    permit = semaphore.acquire_owned() => Some(
                        permit.map_err(|_| HedgeError::Internal("task limiter closed".to_string()))?,
                    ),
                },
                None => None,
            };

            tokio::select! {
                biased;
                _ = token.cancelled() => Err(HedgeError::Cancelled),
                result = unit => result,
            }
        });
        self.spawned += 1;
    }

    /// 모든 작업의 결과를 도착 순서대로 모읍니다.
    ///
    /// 첫 번째 실패에서 토큰을 취소하고 남은 작업을 중단시킨 뒤, 모두 종료될 때까지 기다렸다가
    /// 그 에러를 반환합니다.
    pub async fn join_all(mut self) -> HedgeResult<Vec<T>> {
        let mut results = Vec::with_capacity(self.spawned);

        while let Some(joined) = self.tasks.join_next().await {
            let outcome = match joined {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Err(HedgeError::Cancelled),
                Err(e) => Err(HedgeError::Internal(format!(
                    "{} task panicked: {}",
                    self.stage, e
                ))),
            };

            match outcome {
                Ok(value) => results.push(value),
                Err(err) => {
                    warn!(
                        stage = self.stage,
                        completed = results.len(),
                        total = self.spawned,
                        error = %err,
                        "작업 실패: 나머지 작업 취소"
                    );
                    self.token.cancel();
                    self.tasks.abort_all();
                    while self.tasks.join_next().await.is_some() {}
                    return Err(err);
                }
            }
        }

        debug!(stage = self.stage, count = results.len(), "단계 완료");
        Ok(results)
    }
}
