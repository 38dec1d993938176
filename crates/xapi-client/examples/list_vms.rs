//! Log in to a XenServer host and list its VMs.
//!
//! ```sh
//! cargo run --example list_vms -- https://xen.example.com root secret
//! ```

use anyhow::{Context, bail};
use xapi_client::api::session::Session;
use xapi_client::api::vm::Vm;
use xapi_client::Connection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xapi_client=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(url), Some(username), Some(password)) = (args.next(), args.next(), args.next())
    else {
        bail!("usage: list_vms <url> <username> <password>");
    };

    let conn = Connection::new(url.parse().context("invalid server URL")?)?;
    let _session = Session::login_with_password(&conn, &username, &password).await?;
    println!("logged in, API version {}", conn.api_version());

    let mut vms: Vec<_> = Vm::get_all_records(&conn)
        .await?
        .into_values()
        .filter(|vm| !vm.is_a_template)
        .collect();
    vms.sort_by(|a, b| a.name_label.cmp(&b.name_label));

    for vm in &vms {
        println!("{:<40} {}", vm.name_label, vm.power_state);
    }
    println!("{} VMs", vms.len());

    Session::logout(&conn).await?;
    Ok(())
}
