//! Shared test support: a scripted in-memory driver and helpers.
#![allow(dead_code)]

use sqlbridge::error::{ExecutionErrorKind, StatementErrorKind};
use sqlbridge::{
    Cursor, Cx, Driver, DriverConnection, DriverStatement, Error, OpenParams, Outcome,
    PrepareOptions, Value,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Shared recording state behind a scripted driver.
pub struct DriverState {
    pub open_calls: AtomicUsize,
    pub prepare_calls: AtomicUsize,
    pub exec_calls: AtomicUsize,
    pub seen_params: Mutex<Vec<OpenParams>>,
    pub prepared: Mutex<Vec<(String, PrepareOptions)>>,
    fail_open: Mutex<Option<Error>>,
}

/// An in-memory driver with scripted behavior.
///
/// Opening yields once before completing so a concurrent caller can
/// observe the attempt in flight. Statements whose text does not start
/// with a SQL verb fail at prepare time; statements containing
/// `FAIL_EXEC` fail at execution time; `SELECT`s produce a single-row
/// cursor with a `value` column.
#[derive(Clone)]
pub struct ScriptedDriver {
    state: Arc<DriverState>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self {
            state: Arc::new(DriverState {
                open_calls: AtomicUsize::new(0),
                prepare_calls: AtomicUsize::new(0),
                exec_calls: AtomicUsize::new(0),
                seen_params: Mutex::new(Vec::new()),
                prepared: Mutex::new(Vec::new()),
                fail_open: Mutex::new(None),
            }),
        }
    }

    /// A driver whose every open attempt fails with the given error.
    pub fn failing(error: Error) -> Self {
        let driver = Self::new();
        *driver.state.fail_open.lock().unwrap() = Some(error);
        driver
    }

    pub fn state(&self) -> &Arc<DriverState> {
        &self.state
    }
}

impl Driver for ScriptedDriver {
    type Conn = ScriptedConnection;

    fn open(
        &self,
        _cx: &Cx,
        params: &OpenParams,
    ) -> impl Future<Output = Outcome<ScriptedConnection, Error>> + Send {
        let state = Arc::clone(&self.state);
        let params = params.clone();
        async move {
            // Keep the attempt in flight for at least one scheduling point.
            YieldOnce::new().await;

            state.open_calls.fetch_add(1, Ordering::SeqCst);
            state.seen_params.lock().unwrap().push(params);

            let scripted_failure = state.fail_open.lock().unwrap().clone();
            match scripted_failure {
                Some(error) => Outcome::Err(error),
                None => Outcome::Ok(ScriptedConnection { state }),
            }
        }
    }
}

pub struct ScriptedConnection {
    state: Arc<DriverState>,
}

const VERBS: [&str; 6] = ["SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP"];

impl DriverConnection for ScriptedConnection {
    type Stmt = ScriptedStatement;

    fn prepare(
        &self,
        _cx: &Cx,
        sql: &str,
        options: &PrepareOptions,
    ) -> impl Future<Output = Outcome<ScriptedStatement, Error>> + Send {
        let state = Arc::clone(&self.state);
        let sql = sql.to_string();
        let options = *options;
        async move {
            state.prepare_calls.fetch_add(1, Ordering::SeqCst);
            state.prepared.lock().unwrap().push((sql.clone(), options));

            let upper = sql.to_uppercase();
            if !VERBS.iter().any(|verb| upper.starts_with(verb)) {
                return Outcome::Err(Error::Statement(
                    sqlbridge::error::StatementError {
                        kind: StatementErrorKind::Syntax,
                        sql: None,
                        message: format!("unrecognized statement: {sql:?}"),
                        source: None,
                    }
                    .with_sql(sql),
                ));
            }

            Outcome::Ok(ScriptedStatement { state, sql })
        }
    }
}

pub struct ScriptedStatement {
    state: Arc<DriverState>,
    sql: String,
}

impl DriverStatement for ScriptedStatement {
    fn exec(self, _cx: &Cx) -> impl Future<Output = Outcome<Cursor, Error>> + Send {
        async move {
            self.state.exec_calls.fetch_add(1, Ordering::SeqCst);

            if self.sql.contains("FAIL_EXEC") {
                return Outcome::Err(Error::execution(
                    ExecutionErrorKind::Execute,
                    format!("execution failed for {:?}", self.sql),
                ));
            }

            if self.sql.to_uppercase().starts_with("SELECT") {
                Outcome::Ok(Cursor::new(
                    vec!["value".to_string()],
                    vec![vec![Value::BigInt(1)]],
                ))
            } else {
                Outcome::Ok(Cursor::empty())
            }
        }
    }
}

/// A future that is pending exactly once before completing.
pub struct YieldOnce {
    yielded: bool,
}

impl YieldOnce {
    pub fn new() -> Self {
        Self { yielded: false }
    }
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Observer that counts deliveries and keeps the last error.
pub struct CountingObserver {
    pub connected: AtomicUsize,
    pub errors: AtomicUsize,
    pub last_error: Mutex<Option<Error>>,
}

impl CountingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        })
    }

    pub fn connected_count(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl sqlbridge::ClientObserver<ScriptedConnection> for CountingObserver {
    fn connected(&self, _conn: &ScriptedConnection) {
        self.connected.fetch_add(1, Ordering::SeqCst);
    }

    fn error(&self, error: &Error) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        *self.last_error.lock().unwrap() = Some(error.clone());
    }
}

pub fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

pub fn unwrap_failure<T>(outcome: Outcome<T, Error>) -> Error {
    match outcome {
        Outcome::Ok(_) => panic!("expected a failure, got success"),
        Outcome::Err(e) => e,
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

/// Drive two futures by interleaved polling until both complete.
///
/// Used to overlap `connect()` calls without a spawn surface: the second
/// future genuinely starts while the first attempt is still in flight.
pub fn run_both<A, B>(a: A, b: B) -> (A::Output, B::Output)
where
    A: Future,
    B: Future,
{
    let mut a = Box::pin(a);
    let mut b = Box::pin(b);
    let mut cx = Context::from_waker(Waker::noop());
    let mut out_a = None;
    let mut out_b = None;

    for _ in 0..10_000 {
        if out_a.is_none() {
            if let Poll::Ready(v) = a.as_mut().poll(&mut cx) {
                out_a = Some(v);
            }
        }
        if out_b.is_none() {
            if let Poll::Ready(v) = b.as_mut().poll(&mut cx) {
                out_b = Some(v);
            }
        }
        if out_a.is_some() && out_b.is_some() {
            break;
        }
    }

    match (out_a, out_b) {
        (Some(a), Some(b)) => (a, b),
        _ => panic!("futures did not complete after interleaved polling"),
    }
}
