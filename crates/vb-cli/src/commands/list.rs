use anyhow::bail;
use vb_core::listing::SortSpec;
use vb_db::repos::reservation::{ListQuery, ReservationFilter};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::identity::{actor, require_staff};
use crate::commands::shared::paging::page_request;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vbk list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ListQuery {
        page: page_request(args.page, args.page_size, &ctx.config.listing),
        sort: SortSpec::parse(&args.sort, &args.direction),
        include_inactive: args.include_cancelled,
    };

    let page = if args.all {
        require_staff(&flags.identity, "listing every reservation")?;
        let filter = ReservationFilter {
            venue_id: args.venue,
            owner_id: args.owner,
        };
        ctx.desk.service().list_all(filter, query).await?
    } else {
        if args.venue.is_some() || args.owner.is_some() {
            bail!("--venue and --owner filters require --all");
        }
        let actor = actor(&flags.identity)?;
        ctx.desk.service().list_mine(&actor, query).await?
    };

    output(&page, flags.output)
}
