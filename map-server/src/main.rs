use std::{error::Error, num::NonZeroUsize, path::PathBuf};

use render::{render_png, RenderRequest};
use rouille::{try_or_400::ErrJson, Request, Response};
use url::Url;

fn handle(req: &Request, store_path: &PathBuf) -> Result<Response, Box<dyn Error>> {
	let url = Url::parse(&format!("http://127.0.0.1{}", req.raw_url()))?;

	if url.path() != "/map.png" {
		return Ok(Response::empty_404());
	}

	let mut min_lon = None;
	let mut min_lat = None;
	let mut max_lon = None;
	let mut max_lat = None;
	let mut size = None;

	for (key, val) in url.query_pairs() {
		match key.as_ref() {
			"minLon" => min_lon = Some(val.parse::<f64>()?),
			"minLat" => min_lat = Some(val.parse::<f64>()?),
			"maxLon" => max_lon = Some(val.parse::<f64>()?),
			"maxLat" => max_lat = Some(val.parse::<f64>()?),
			"size" => size = Some(val.parse::<u32>()?),
			_ => return Err(From::from("unknown query param")),
		}
	}

	let request = RenderRequest {
		min_lon: min_lon.ok_or("missing minLon")?,
		min_lat: min_lat.ok_or("missing minLat")?,
		max_lon: max_lon.ok_or("missing maxLon")?,
		max_lat: max_lat.ok_or("missing maxLat")?,
		size: size.ok_or("missing size")?,
	};

	let png = render_png(store_path, request)?;
	Ok(Response::from_data("image/png", png))
}

fn main() {
	env_logger::init();

	let path = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| {
		println!("Usage: {} <path>", std::env::args().next().unwrap());
		std::process::exit(1);
	}));

	rouille::start_server_with_pool(
		"0.0.0.0:42069",
		std::thread::available_parallelism().ok().map(NonZeroUsize::get),
		move |req| match handle(req, &path) {
			Ok(response) => response,
			Err(e) => {
				log::warn!("request failed: {e}");
				Response::json(&ErrJson::from_err(&*e)).with_status_code(400)
			}
		},
	);
}
