//! The `set` command: updates CLI options and the active profile.

use crate::error::Error;
use crate::session::Session;

pub fn handle(session: &mut Session, args: &[String]) -> Result<(), Error> {
    if args.is_empty() {
        println!("Usage: set <option> <value>. Press tab-tab to see available options.");
        return Ok(());
    }
    if args.last().is_some_and(|arg| arg == "-h") {
        println!("Usage: set <option> <value>. Press tab-tab to see available options and values.");
        return Ok(());
    }

    let key = args[0].as_str();
    let value = args[1..].join(" ").trim().to_string();
    session.apply_setting(key, &value)?;

    if key == "profile" {
        let config = &session.config;
        let profile = config.active_profile();
        println!("Loaded server profile: {}", config.core.profile);
        println!("Url:         {}", profile.url);
        println!("Username:    {}", profile.username);
        println!("Domain:      {}", profile.domain);
        println!("API Key:     {}", profile.apikey);
        println!("Total APIs:  {}", session.catalog().len());
    }
    Ok(())
}
