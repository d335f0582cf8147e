/*!
 * Deadlock Engine - Demo Entry Point
 *
 * Embeds the admission controller the way a host application would:
 * - Seeds the initial process population
 * - Injects a stress batch of random max claims
 * - Drives concurrent request/finish traffic from several tasks
 * - Reports metrics and the recent event history
 */

use deadlock_engine::{
    init_tracing, AdmissionController, AdmissionControllerBuilder, ChannelSink, EngineConfig,
    EngineError, FanoutSink, HistorySink, MetricsCollector, MetricsSink, ProcessId,
    ResourceVector, StressGenerator, TracingSink,
};
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const WORKERS: usize = 4;
const ROUNDS: usize = 50;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Deadlock engine starting...");
    info!("================================================");

    let config = EngineConfig::from_env()?;
    info!(
        total = %config.total_resources,
        scan_policy = %config.scan_policy,
        "Configuration loaded"
    );

    let metrics = Arc::new(MetricsCollector::new());
    let history = Arc::new(HistorySink::new(config.event_history, config.ops_history));
    let (channel, events) = ChannelSink::unbounded();
    let sink = FanoutSink::new()
        .with(Arc::new(TracingSink))
        .with(Arc::new(MetricsSink::new(metrics.clone())))
        .with(history.clone())
        .with(Arc::new(channel));

    let controller = Arc::new(
        AdmissionControllerBuilder::from_config(&config)
            .with_sink(Arc::new(sink))
            .build(),
    );

    seed_population(&controller)?;

    let mut generator = StressGenerator::from_config(&config);
    generator.inject(&controller)?;

    // Event consumer: counts what the engine reports while traffic runs
    let consumer = tokio::spawn(async move {
        let mut received = 0u64;
        while let Ok(event) = events.recv_async().await {
            received += 1;
            tracing::trace!(pid = %event.pid, outcome = %event.outcome, "event received");
        }
        received
    });

    let mut workers = tokio::task::JoinSet::new();
    for worker in 0..WORKERS {
        let controller = Arc::clone(&controller);
        workers.spawn(async move { drive(worker, controller).await });
    }

    let interrupted = tokio::select! {
        _ = async {
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(Err(e)) => warn!(error = %e, "worker stopped with an engine error"),
                    Err(e) => warn!(error = %e, "worker task failed"),
                    Ok(Ok(())) => {}
                }
            }
        } => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        info!("Interrupted, stopping workers");
        workers.abort_all();
        while workers.join_next().await.is_some() {}
    }

    let report = controller.check_current()?;
    info!(
        safe = report.safe,
        active = controller.active_count(),
        available = %controller.available(),
        "Final state"
    );

    let snapshot = metrics.snapshot();
    info!(
        metrics = %serde_json::to_string(&snapshot).into_diagnostic()?,
        ops_series = ?history.ops_series(),
        "Run complete"
    );
    for event in history.recent_events() {
        info!(pid = %event.pid, outcome = %event.outcome, ops = event.operations_performed, "recent");
    }

    // Dropping the controller closes the event channel
    drop(controller);
    let received = consumer.await.into_diagnostic()?;
    info!(received, "Event consumer drained");

    Ok(())
}

/// Initial population: two processes already holding resources
fn seed_population(controller: &AdmissionController) -> Result<(), EngineError> {
    if controller.total_resources().len() != 3 {
        info!("Non-default resource layout, skipping seed population");
        return Ok(());
    }
    controller.create_process([2, 1, 1], [5, 4, 3])?;
    controller.create_process([1, 2, 1], [3, 5, 2])?;
    Ok(())
}

/// One worker: repeatedly ask for at most one unit per type for the
/// processes it owns, finishing each as soon as it reaches its max claim
async fn drive(worker: usize, controller: Arc<AdmissionController>) -> Result<(), EngineError> {
    for _ in 0..ROUNDS {
        let snapshot = controller.snapshot();
        let owned: Vec<(ProcessId, ResourceVector)> = snapshot
            .processes()
            .active()
            .filter(|p| p.id().0 as usize % WORKERS == worker)
            .map(|p| (p.id(), p.need()))
            .collect();

        if owned.is_empty() {
            break;
        }

        for (pid, need) in owned {
            if need.is_zero() {
                controller.finish_process(pid)?;
                continue;
            }
            let step = ResourceVector::new(need.iter().map(|n| n.min(1)).collect());
            controller.request(pid, step)?;
        }

        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    Ok(())
}
