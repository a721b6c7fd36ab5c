use anyhow::Context;
use clap::Args;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Identity subject id; a fresh one is generated if omitted")]
    pub sub: Option<Uuid>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, help = "Role claim to embed, e.g. admin")]
    pub role: Option<String>,
}

pub fn handle(args: TokenArgs) -> anyhow::Result<()> {
    let sub = args.sub.unwrap_or_else(Uuid::new_v4);

    let claims = Claims::new(sub, args.email, args.name, None, args.role);
    let token = generate_jwt(claims).context("JWT_SECRET must be set to mint tokens")?;

    println!("subject: {sub}");
    println!("{token}");
    Ok(())
}
