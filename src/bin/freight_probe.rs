use landed::catalog::FreightCatalog;
use landed::freight::{FreightQuoter, SimulatedFreightCost};
use landed::types::Route;

fn main() {
    let route = Route::new(std::env::args().nth(1).unwrap_or_else(|| "Route A".to_string()));
    let jitter: f64 = std::env::args()
        .nth(2)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.10);
    let quoter = SimulatedFreightCost::new(FreightCatalog::default(), jitter);
    let q = quoter.quote(&route);
    println!("{} -> cost={:.2} {}", q.route, q.freight_cost, q.currency);
}
