use dnstoys_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<DnsServerHandler>,
    num_workers: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let num_workers = num_workers.max(1);

    info!(bind_address = %socket_addr, num_workers, "Starting DNS server");

    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..num_workers {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = Arc::clone(&handler);
        let worker_shutdown = shutdown.clone();
        join_set.spawn(async move {
            run_udp_worker(udp_socket, handler_udp, i, worker_shutdown).await;
        });
    }

    info!("DNS server ready: {} workers on {}", num_workers, socket_addr);

    while join_set.join_next().await.is_some() {}

    info!("DNS server stopped");
    Ok(())
}

async fn run_udp_worker(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    worker_id: usize,
    shutdown: CancellationToken,
) {
    let mut recv_buf = [0u8; 4096];

    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => received,
        };

        match received {
            Ok((n, from)) => {
                let client_ip = from.ip();
                let handler_clone = Arc::clone(&handler);
                let socket_clone = Arc::clone(&socket);
                let owned_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);
                tokio::spawn(async move {
                    if let Some(response) = handler_clone.handle_raw(&owned_buf, client_ip).await
                    {
                        if let Err(e) = socket_clone.send_to(&response, from).await {
                            debug!(client = %from, error = %e, "UDP send failed");
                        }
                    }
                });
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // ICMP port unreachable from a previous reply surfaces here on some platforms
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => continue,
            Err(e) => {
                error!(worker = worker_id, error = %e, "UDP recv error");
            }
        }
    }

    debug!(worker = worker_id, "UDP worker stopped");
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
