use std::f64::consts::PI;

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::state::{HitTarget, MapState, Node, NodeKind};
use super::types::ProxyDescriptor;

const BACKGROUND_INNER: &str = "#002b59";
const BACKGROUND_OUTER: &str = "#001f3f";
const LINK_RGB: &str = "0, 184, 148";
const TEXT: &str = "#ffffff";
const LABEL_SHADOW: &str = "rgba(0, 0, 0, 0.7)";

/// Deterministic stand-in for `Math.random`, so the texture is stable between frames.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

#[allow(deprecated)]
fn fill_with(ctx: &CanvasRenderingContext2d, gradient: &CanvasGradient) {
	ctx.set_fill_style(gradient);
}

#[allow(deprecated)]
fn stroke_with(ctx: &CanvasRenderingContext2d, gradient: &CanvasGradient) {
	ctx.set_stroke_style(gradient);
}

fn radial(
	ctx: &CanvasRenderingContext2d,
	(x0, y0, r0): (f64, f64, f64),
	(x1, y1, r1): (f64, f64, f64),
	stops: &[(f32, &str)],
) -> Option<CanvasGradient> {
	let gradient = ctx.create_radial_gradient(x0, y0, r0, x1, y1, r1).ok()?;
	for &(offset, color) in stops {
		gradient.add_color_stop(offset, color).ok()?;
	}
	Some(gradient)
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}

pub fn render(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_background(state, ctx);
	draw_links(state, ctx);
	draw_server(state, ctx);
	for (idx, node) in state.proxies.iter().enumerate() {
		if let NodeKind::Proxy(proxy) = &node.kind {
			let hovered = state.hover == Some(HitTarget::Proxy(idx)) || state.drag.node_idx == Some(idx);
			draw_proxy(ctx, node, proxy, hovered);
		}
	}
}

fn draw_background(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.width, state.height);
	let (cx, cy) = (w / 2.0, h / 2.0);

	if let Some(gradient) = radial(
		ctx,
		(cx, cy, 0.0),
		(cx, cy, w.max(h) * 0.8),
		&[(0.0, BACKGROUND_INNER), (1.0, BACKGROUND_OUTER)],
	) {
		fill_with(ctx, &gradient);
	} else {
		ctx.set_fill_style_str(BACKGROUND_OUTER);
	}
	ctx.fill_rect(0.0, 0.0, w, h);

	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.05)");
	ctx.set_line_width(1.0);
	for i in 1..=8 {
		let radius = w.min(h) * 0.08 * i as f64;
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, radius, 0.0, 2.0 * PI);
		ctx.stroke();
	}

	// Wavy grid
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.03)");
	let mut row = 0.0;
	while row < h {
		ctx.begin_path();
		ctx.move_to(0.0, row);
		let mut x = 0.0;
		while x < w {
			ctx.line_to(x, row + (x * 0.01).sin() * 8.0);
			x += 5.0;
		}
		ctx.stroke();
		row += 50.0;
	}
	let mut col = 0.0;
	while col < w {
		ctx.begin_path();
		ctx.move_to(col, 0.0);
		let mut y = 0.0;
		while y < h {
			ctx.line_to(col + (y * 0.01 + col * 0.01).sin() * 10.0, y);
			y += 5.0;
		}
		ctx.stroke();
		col += 80.0;
	}

	for i in 0..10 {
		let (x, y) = (rand_simple(i * 3) * w, rand_simple(i * 3 + 1) * h);
		let radius = rand_simple(i * 3 + 2) * 100.0 + 50.0;
		if let Some(spot) = radial(
			ctx,
			(x, y, 0.0),
			(x, y, radius),
			&[
				(0.0, "rgba(100, 200, 255, 0.03)"),
				(1.0, "rgba(100, 200, 255, 0)"),
			],
		) {
			fill_with(ctx, &spot);
			fill_circle(ctx, x, y, radius);
		}
	}
}

fn draw_links(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let (sx, sy) = (state.server.x, state.server.y);
	let cycle = state.config.pulse_cycle_ms.max(1.0);
	let phase = (state.clock % cycle) / cycle;

	for (idx, node) in state.proxies.iter().enumerate() {
		let highlighted = state.hover == Some(HitTarget::Proxy(idx));
		let gradient = ctx.create_linear_gradient(sx, sy, node.x, node.y);
		let _ = gradient.add_color_stop(0.0, &format!("rgba({LINK_RGB}, 0.8)"));
		let _ = gradient.add_color_stop(1.0, &format!("rgba({LINK_RGB}, 0.4)"));
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(node.x, node.y);
		stroke_with(ctx, &gradient);
		ctx.set_line_width(if highlighted { 3.0 } else { 2.0 });
		ctx.stroke();

		let (dx, dy) = (node.x - sx, node.y - sy);
		let length = (dx * dx + dy * dy).sqrt();
		let pulses = ((length / 120.0).floor() as usize).max(2);
		for i in 0..pulses {
			let t = (phase + i as f64 / pulses as f64) % 1.0;
			let (px, py) = (sx + dx * t, sy + dy * t);
			let fade = (t * PI).sin();
			let size = 2.0 + fade * 2.0;

			let (head, tail) = (
				format!("rgba({LINK_RGB}, {})", 0.8 * fade),
				format!("rgba({LINK_RGB}, 0)"),
			);
			if let Some(trail) = radial(
				ctx,
				(px, py, 0.0),
				(px, py, size * 2.0),
				&[(0.0, head.as_str()), (1.0, tail.as_str())],
			) {
				fill_with(ctx, &trail);
				fill_circle(ctx, px, py, size * 2.0);
			}
			ctx.set_fill_style_str(&format!("rgba({LINK_RGB}, {})", 0.9 * fade));
			fill_circle(ctx, px, py, size);
		}
	}
}

fn set_label_shadow(ctx: &CanvasRenderingContext2d, on: bool) {
	if on {
		ctx.set_shadow_color(LABEL_SHADOW);
		ctx.set_shadow_blur(3.0);
		ctx.set_shadow_offset_x(1.0);
		ctx.set_shadow_offset_y(1.0);
	} else {
		ctx.set_shadow_color("transparent");
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_x(0.0);
		ctx.set_shadow_offset_y(0.0);
	}
}

/// Cloud glyph drawn in a 100-unit box scaled to twice the server radius.
fn draw_server(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let server = &state.server;
	let label = match &server.kind {
		NodeKind::Server { label } => label.as_str(),
		NodeKind::Proxy(proxy) => proxy.name.as_str(),
	};
	let scale = server.radius * 2.0 / 100.0;

	ctx.save();
	let _ = ctx.translate(server.x, server.y);
	let _ = ctx.scale(scale, scale);

	ctx.begin_path();
	ctx.move_to(-25.0, 10.0);
	ctx.bezier_curve_to(-45.0, 15.0, -50.0, -15.0, -25.0, -20.0);
	ctx.bezier_curve_to(-15.0, -50.0, 25.0, -50.0, 35.0, -20.0);
	ctx.bezier_curve_to(65.0, -35.0, 80.0, 5.0, 45.0, 20.0);
	ctx.bezier_curve_to(55.0, 45.0, 20.0, 55.0, 5.0, 30.0);
	ctx.bezier_curve_to(-25.0, 45.0, -45.0, 25.0, -25.0, 10.0);
	if let Some(cloud) = radial(
		ctx,
		(0.0, 0.0, 10.0),
		(0.0, 0.0, 70.0),
		&[
			(0.0, "rgba(255, 255, 255, 0.9)"),
			(1.0, "rgba(220, 230, 255, 0.7)"),
		],
	) {
		fill_with(ctx, &cloud);
	}
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
	ctx.set_line_width(2.0);
	ctx.stroke();

	ctx.begin_path();
	ctx.rect(-15.0, -12.0, 30.0, 24.0);
	ctx.set_fill_style_str(BACKGROUND_OUTER);
	ctx.fill();
	ctx.set_stroke_style_str(TEXT);
	ctx.set_line_width(1.5);
	for i in 1..4 {
		let y = -8.0 + i as f64 * 6.0;
		ctx.begin_path();
		ctx.move_to(-12.0, y);
		ctx.line_to(12.0, y);
		ctx.stroke();
	}

	let (inner, outer) = (
		format!("rgba({LINK_RGB}, 0.2)"),
		format!("rgba({LINK_RGB}, 0)"),
	);
	if let Some(glow) = radial(
		ctx,
		(0.0, 0.0, 30.0),
		(0.0, 0.0, 60.0),
		&[(0.0, inner.as_str()), (1.0, outer.as_str())],
	) {
		fill_with(ctx, &glow);
		fill_circle(ctx, 0.0, 0.0, 60.0);
	}

	set_label_shadow(ctx, true);
	ctx.set_fill_style_str(TEXT);
	ctx.set_font("bold 16px Roboto, sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(label, 0.0, 45.0);
	ctx.restore();
}

fn draw_proxy(ctx: &CanvasRenderingContext2d, node: &Node, proxy: &ProxyDescriptor, hovered: bool) {
	let (x, y, r) = (node.x, node.y, node.radius);
	let color = proxy.status.color();

	let glow_radius = if hovered { r * 1.6 } else { r * 1.3 };
	if let Some(glow) = radial(
		ctx,
		(x, y, r * 0.6),
		(x, y, glow_radius),
		&[(0.0, color), (1.0, "rgba(0, 0, 0, 0)")],
	) {
		fill_with(ctx, &glow);
		fill_circle(ctx, x, y, glow_radius);
	}

	ctx.set_fill_style_str(color);
	fill_circle(ctx, x, y, r);
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(TEXT);
	ctx.set_line_width(if hovered { 2.5 } else { 1.5 });
	ctx.stroke();

	// Rack icon
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.7)");
	ctx.fill_rect(x - r * 0.5, y - r * 0.3, r, r * 0.6);
	ctx.set_stroke_style_str("rgba(0, 31, 63, 0.6)");
	ctx.set_line_width(1.0);
	for i in 1..=3 {
		let ly = y - r * 0.2 + i as f64 * r * 0.15;
		ctx.begin_path();
		ctx.move_to(x - r * 0.4, ly);
		ctx.line_to(x + r * 0.4, ly);
		ctx.stroke();
	}

	set_label_shadow(ctx, true);
	ctx.set_fill_style_str(TEXT);
	ctx.set_font("bold 14px Roboto, sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&proxy.name, x, y + r + 18.0);
	set_label_shadow(ctx, false);

	let (bx, by, br) = (x + r * 0.8, y - r * 0.8, 14.0);
	if let Some(badge) = radial(
		ctx,
		(bx, by, 0.0),
		(bx, by, br),
		&[(0.0, "#5b9eed"), (1.0, "#3b82f6")],
	) {
		fill_with(ctx, &badge);
		fill_circle(ctx, bx, by, br);
	}
	ctx.begin_path();
	let _ = ctx.arc(bx, by, br, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(TEXT);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(TEXT);
	ctx.set_font("bold 12px Roboto, sans-serif");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&proxy.hosts_count.to_string(), bx, by);
	ctx.set_text_baseline("alphabetic");
}
