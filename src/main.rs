use anyhow::Result;
use log::error;

use sungrow_bridge::options::Options;

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::new();

    tokio::select! {
        res = sungrow_bridge::app(options) => {
            if let Err(e) = &res {
                error!("Application error: {:#}", e);
            }
            res
        }
        _ = tokio::signal::ctrl_c() => {
            error!("Interrupted");
            Ok(())
        }
    }
}
