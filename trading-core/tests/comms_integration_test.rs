use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use trading::PriceTick;
use trading_core::comms::builder::{build_publisher, build_subscriber};
use trading_core::comms::socket::{ReceiverSocket, SenderSocket};
use trading_core::comms::{Address, ChannelError};

// This test verifies that over real ZMQ (TCP):
// 1. A subscriber that fell behind receives only the newest tick
// 2. One receive never yields more than one message
// 3. The backlog is gone after that receive
#[tokio::test]
async fn test_zmq_subscriber_conflates_backlog() -> Result<()> {
    // Use non-standard ports to avoid conflicts with a running pipeline
    let address = Address::zmq_tcp("127.0.0.1", 15995);

    let publisher: SenderSocket<PriceTick> = build_publisher(&address)?;
    let mut subscriber: ReceiverSocket<PriceTick> = build_subscriber(&address)?;

    // Allow ZMQ time to connect
    sleep(Duration::from_millis(200)).await;

    for i in 0..50 {
        let tick = PriceTick::new("AAPL", 100.0 + i as f64 / 10.0, i as f64);
        publisher.send(&tick).await?;
    }

    // Let every message land in the subscriber before reading
    sleep(Duration::from_millis(200)).await;

    let received = timeout(Duration::from_secs(1), subscriber.recv()).await??;
    assert_eq!(received.get_symbol(), "AAPL");
    assert_eq!(received.get_timestamp(), 49.0);

    assert!(
        timeout(Duration::from_millis(100), subscriber.recv())
            .await
            .is_err(),
        "backlog should have been discarded"
    );

    publisher.send(&PriceTick::new("AAPL", 200.0, 50.0)).await?;
    let next = timeout(Duration::from_secs(1), subscriber.recv()).await??;
    assert_eq!(next.get_price(), 200.0);

    Ok(())
}

#[tokio::test]
async fn test_zmq_first_receive_waits_for_publisher() -> Result<()> {
    let address = Address::zmq_tcp("127.0.0.1", 15996);

    // Subscriber first: nothing is bound yet.
    let mut subscriber: ReceiverSocket<PriceTick> = build_subscriber(&address)?;
    assert!(timeout(Duration::from_millis(100), subscriber.recv())
        .await
        .is_err());

    let publisher: SenderSocket<PriceTick> = build_publisher(&address)?;
    sleep(Duration::from_millis(200)).await;
    publisher.send(&PriceTick::new("MSFT", 300.0, 1.0)).await?;

    let tick = timeout(Duration::from_secs(1), subscriber.recv()).await??;
    assert_eq!(tick.get_symbol(), "MSFT");
    Ok(())
}

#[tokio::test]
async fn test_zmq_port_cannot_be_bound_twice() -> Result<()> {
    let address = Address::zmq_tcp("127.0.0.1", 15997);
    let _first: SenderSocket<PriceTick> = build_publisher(&address)?;

    let second = build_publisher::<PriceTick>(&address);
    assert!(matches!(second, Err(ChannelError::Bind { .. })));
    Ok(())
}
