//! Uniform cubic B-spline smoothing for frontier curves.
//!
//! The curve starts and ends exactly on the first and last data points and
//! in between is pulled towards, but not through, the interior points. Each
//! span is a cubic Bézier whose control points are the usual 1/3, 2/3 and
//! 1/6-4/6-1/6 blends of neighbouring data points; spans are flattened into
//! `samples_per_segment` line pieces so callers get a plain polyline.

pub type Point = (f64, f64);

pub fn basis_spline(points: &[Point], samples_per_segment: usize) -> Vec<Point> {
    let steps = samples_per_segment.max(1);

    match points {
        [] => Vec::new(),
        [only] => vec![*only],
        [first, last] => vec![*first, *last],
        _ => {
            let mut out = Vec::with_capacity(points.len() * steps + 2);
            let first = points[0];
            let second = points[1];
            out.push(first);

            let mut cursor = blend(first, second, 5.0, 1.0, 6.0);
            out.push(cursor);

            let mut p0 = first;
            let mut p1 = second;
            for &p in &points[2..] {
                cursor = emit_span(&mut out, cursor, p0, p1, p, steps);
                p0 = p1;
                p1 = p;
            }

            // Close with a span towards the last point repeated, then land on it.
            emit_span(&mut out, cursor, p0, p1, p1, steps);
            out.push(p1);
            out
        }
    }
}

fn emit_span(out: &mut Vec<Point>, start: Point, p0: Point, p1: Point, p: Point, steps: usize) -> Point {
    let c1 = blend(p0, p1, 2.0, 1.0, 3.0);
    let c2 = blend(p0, p1, 1.0, 2.0, 3.0);
    let end = (
        (p0.0 + 4.0 * p1.0 + p.0) / 6.0,
        (p0.1 + 4.0 * p1.1 + p.1) / 6.0,
    );

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        out.push(cubic_bezier(start, c1, c2, end, t));
    }
    end
}

fn blend(a: Point, b: Point, wa: f64, wb: f64, total: f64) -> Point {
    ((wa * a.0 + wb * b.0) / total, (wa * a.1 + wb * b.1) / total)
}

fn cubic_bezier(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p3.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p3.1,
    )
}
