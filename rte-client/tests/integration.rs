use std::sync::Arc;
use std::time::Duration;

use rte_client::BatchClient;
use rte_server::{ClientInterface, Server};
use rte_shared::config::{DriverConfig, ServerConfig};
use rte_worker::testing::{CancellableExecutor, FailingExecutor, TrivialExecutor};
use rte_worker::WorkerDriver;

fn fast_config() -> DriverConfig {
    DriverConfig {
        refresh_time: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn single_successful_task_round_trips() {
    let server = Server::new(ServerConfig::default());

    let worker = WorkerDriver::new(server.worker_handle(), Arc::new(TrivialExecutor), fast_config())
        .with_max_tasks(1);
    let worker_run = tokio::spawn(async move { worker.run().await });

    let outputs = BatchClient::solve(vec![b"ping".to_vec()], server.client_handle(), fast_config()).await;

    worker_run.await.unwrap();
    assert_eq!(outputs, vec![Some(b"ping".to_vec())]);
}

#[tokio::test]
async fn failed_task_reports_none() {
    let server = Server::new(ServerConfig::default());

    let worker = WorkerDriver::new(server.worker_handle(), Arc::new(FailingExecutor), fast_config())
        .with_max_tasks(1);
    let worker_run = tokio::spawn(async move { worker.run().await });

    let outputs = BatchClient::solve(vec![b"doomed".to_vec()], server.client_handle(), fast_config()).await;

    worker_run.await.unwrap();
    assert_eq!(outputs, vec![None]);
}

#[tokio::test]
async fn canceled_task_reports_none() {
    let server = Server::new(ServerConfig::default());

    let executor = Arc::new(CancellableExecutor::new(Duration::from_millis(500)));
    let worker = WorkerDriver::new(server.worker_handle(), executor.clone(), fast_config())
        .with_max_tasks(1);
    let worker_run = tokio::spawn(async move { worker.run().await });

    let client = server.client_handle();
    let solve = tokio::spawn(async move {
        BatchClient::solve(vec![b"slow".to_vec()], client, fast_config()).await
    });

    // give the worker a moment to pick the task up, then cancel it. a
    // single worker against a fresh server always advertises id 0 first.
    tokio::time::sleep(Duration::from_millis(80)).await;
    server.cancel_task(0).await;

    let outputs = solve.await.unwrap();
    worker_run.await.unwrap();

    assert_eq!(outputs, vec![None]);
    assert!(executor.was_canceled());
}

#[tokio::test]
async fn many_clients_many_tasks_many_workers() {
    let server = Server::new(ServerConfig::default());

    let mut worker_runs = Vec::new();
    for _ in 0..10 {
        let worker = WorkerDriver::new(server.worker_handle(), Arc::new(TrivialExecutor), fast_config())
            .with_max_tasks(10);
        worker_runs.push(tokio::spawn(async move { worker.run().await }));
    }

    let mut client_runs = Vec::new();
    for batch in 0..10 {
        let client = server.client_handle();
        let inputs: Vec<Vec<u8>> = (0..10).map(|i| vec![batch as u8, i as u8]).collect();
        client_runs.push(tokio::spawn(async move {
            BatchClient::solve(inputs.clone(), client, fast_config())
                .await
                .into_iter()
                .zip(inputs)
                .all(|(output, input)| output == Some(input))
        }));
    }

    for run in client_runs {
        assert!(run.await.unwrap(), "a batch did not echo every input back");
    }

    server.release_waiting_workers().await;
    for run in worker_runs {
        run.await.unwrap();
    }
}
