//! The `sync` command: refreshes the catalog from the live server.

use crate::constants::OP_LIST_APIS;
use crate::error::Error;
use crate::session::Session;

pub fn handle(session: &mut Session, _args: &[String]) -> Result<(), Error> {
    let payload = session.invoker().invoke(OP_LIST_APIS, &[], false)?;
    session.save_cache(&payload)?;
    session.install_catalog(&payload);
    println!("Discovered {} APIs", session.catalog().len());
    Ok(())
}
