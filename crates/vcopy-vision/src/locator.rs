//! 단일 배율 템플릿 매칭.
//!
//! 영평균 정규화 상호상관(ZNCC)으로 스크린샷 안에서 뷰가 가장 잘 맞는
//! 오프셋을 찾는다. 창 합계/제곱합은 적분 이미지로 O(1)에 구한다.
//!
//! 평탄(분산 0) 영역 처리:
//! - 템플릿과 창 모두 평탄: `1 - |평균 차| / 255`
//! - 한쪽만 평탄: 0
//!
//! 동점이면 행 우선 순서상 가장 앞선 오프셋을 유지한다.

use image::{DynamicImage, GrayImage};
use tracing::debug;
use vcopy_core::models::raster::{MatchPoint, MatchResult};
use vcopy_core::ports::locator::ViewLocator;

/// 기본 매칭 임계값
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.8;

/// 픽셀당 분산이 이 값 이하면 평탄 영역으로 본다
const FLAT_VARIANCE: f64 = 1e-2;

/// 적분 이미지를 미리 계산한 탐색 대상 (그레이스케일)
pub struct SearchImage {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
    /// (width+1) x (height+1) 누적합
    sum: Vec<f64>,
    sq_sum: Vec<f64>,
}

impl SearchImage {
    pub fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let stride = width as usize + 1;
        let mut sum = vec![0.0f64; stride * (height as usize + 1)];
        let mut sq_sum = vec![0.0f64; stride * (height as usize + 1)];
        let pixels: Vec<f32> = gray.as_raw().iter().map(|&v| v as f32).collect();

        for y in 0..height as usize {
            let mut row = 0.0f64;
            let mut row_sq = 0.0f64;
            for x in 0..width as usize {
                let v = pixels[y * width as usize + x] as f64;
                row += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + (x + 1);
                sum[idx] = sum[idx - stride] + row;
                sq_sum[idx] = sq_sum[idx - stride] + row_sq;
            }
        }

        Self {
            width,
            height,
            pixels,
            sum,
            sq_sum,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// (x, y)에서 시작하는 w x h 창의 (합, 제곱합)
    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (f64, f64) {
        let stride = self.width as usize + 1;
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let rect = |t: &[f64]| t[y1 * stride + x1] - t[y0 * stride + x1] - t[y1 * stride + x0] + t[y0 * stride + x0];
        (rect(&self.sum), rect(&self.sq_sum))
    }

    /// 창과 영평균 템플릿의 교차항 Σ(T - mT)·I
    fn cross(&self, template: &Template, x: u32, y: u32) -> f64 {
        let tw = template.width as usize;
        let stride = self.width as usize;
        let mut total = 0.0f64;
        for ty in 0..template.height as usize {
            let start = (y as usize + ty) * stride + x as usize;
            let row = &self.pixels[start..start + tw];
            let t_row = &template.centered[ty * tw..(ty + 1) * tw];
            let acc: f32 = t_row.iter().zip(row).map(|(t, i)| t * i).sum();
            total += acc as f64;
        }
        total
    }
}

/// 평균을 뺀 템플릿
pub struct Template {
    width: u32,
    height: u32,
    centered: Vec<f32>,
    mean: f64,
    /// Σ(T - mT)²
    energy: f64,
}

impl Template {
    pub fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let n = (width as usize * height as usize).max(1) as f64;
        let mean = gray.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
        let centered: Vec<f32> = gray
            .as_raw()
            .iter()
            .map(|&v| (v as f64 - mean) as f32)
            .collect();
        let energy = centered.iter().map(|&c| (c as f64) * (c as f64)).sum();

        Self {
            width,
            height,
            centered,
            mean,
            energy,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel_count(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// 오프셋 탐색 범위 (좌상단 기준, 양끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetWindow {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

/// 한 오프셋의 매칭 점수
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    /// 좌상단 오프셋
    pub x: u32,
    pub y: u32,
    /// 매칭된 템플릿 크기
    pub width: u32,
    pub height: u32,
    pub score: f32,
}

impl Correlation {
    /// 매칭 영역 중심 (정수 나눗셈)
    pub fn centroid(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn to_point(&self) -> MatchPoint {
        let (x, y) = self.centroid();
        MatchPoint {
            x,
            y,
            confidence: self.score,
        }
    }
}

fn zncc(search: &SearchImage, template: &Template, x: u32, y: u32) -> f32 {
    let n = template.pixel_count();
    let (s, sq) = search.window(x, y, template.width, template.height);
    let variance = (sq - s * s / n).max(0.0);
    let flat_template = template.energy <= FLAT_VARIANCE * n;
    let flat_window = variance <= FLAT_VARIANCE * n;

    let score = match (flat_template, flat_window) {
        (true, true) => 1.0 - (template.mean - s / n).abs() / 255.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => search.cross(template, x, y) / (template.energy * variance).sqrt(),
    };

    score.clamp(-1.0, 1.0) as f32
}

/// 탐색 범위 안에서 최고 점수 오프셋
///
/// 템플릿이 스크린샷에 들어가지 않거나 범위가 비면 None.
pub fn best_offset(
    search: &SearchImage,
    template: &Template,
    window: Option<OffsetWindow>,
) -> Option<Correlation> {
    if template.width == 0
        || template.height == 0
        || template.width > search.width
        || template.height > search.height
    {
        return None;
    }

    let max_x = search.width - template.width;
    let max_y = search.height - template.height;
    let range = window.unwrap_or(OffsetWindow {
        x_min: 0,
        x_max: max_x,
        y_min: 0,
        y_max: max_y,
    });
    let (x_min, x_max) = (range.x_min.min(max_x), range.x_max.min(max_x));
    let (y_min, y_max) = (range.y_min.min(max_y), range.y_max.min(max_y));
    if x_min > x_max || y_min > y_max {
        return None;
    }

    let mut best: Option<Correlation> = None;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let score = zncc(search, template, x, y);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Correlation {
                    x,
                    y,
                    width: template.width,
                    height: template.height,
                    score,
                });
            }
        }
    }
    best
}

/// 단일 배율 템플릿 탐색기
///
/// 뷰를 리사이즈하지 않는다. 뷰가 스크린샷보다 크면 항상 `NotFound`.
pub struct TemplateLocator {
    threshold: f32,
}

impl TemplateLocator {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// 임계값과 무관한 최고 점수 매칭
    pub fn best_match(&self, view: &DynamicImage, screenshot: &DynamicImage) -> Option<Correlation> {
        let search = SearchImage::new(&screenshot.to_luma8());
        let template = Template::new(&view.to_luma8());
        best_offset(&search, &template, None)
    }
}

impl Default for TemplateLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl ViewLocator for TemplateLocator {
    fn locate(&self, view: &DynamicImage, screenshot: &DynamicImage) -> MatchResult {
        match self.best_match(view, screenshot) {
            Some(best) if best.score >= self.threshold => MatchResult::Found(best.to_point()),
            Some(best) => {
                debug!(score = best.score, threshold = self.threshold, "임계값 미달");
                MatchResult::NotFound
            }
            None => MatchResult::NotFound,
        }
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Luma, RgbaImage};

    /// 블록 단위 의사난수 회색 패턴 (결정적)
    pub(crate) fn block_pattern(w: u32, h: u32, block: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let (bx, by) = (x / block, y / block);
            let mut v = bx
                .wrapping_mul(73_856_093)
                ^ by.wrapping_mul(19_349_663)
                ^ seed.wrapping_mul(83_492_791);
            v ^= v >> 13;
            v = v.wrapping_mul(0x5bd1_e995);
            v ^= v >> 15;
            Luma([(v & 0xff) as u8])
        })
    }

    fn crop(img: &GrayImage, x: u32, y: u32, w: u32, h: u32) -> GrayImage {
        image::imageops::crop_imm(img, x, y, w, h).to_image()
    }

    #[test]
    fn embedded_view_found_at_centroid() {
        let shot = block_pattern(120, 90, 3, 1);
        let view = crop(&shot, 37, 41, 30, 20);

        let result = TemplateLocator::default().locate(
            &DynamicImage::ImageLuma8(view),
            &DynamicImage::ImageLuma8(shot),
        );

        let point = result.point().expect("found");
        assert_eq!((point.x, point.y), (52, 51));
        assert!(point.confidence > 0.99);
    }

    #[test]
    fn color_inputs_are_accepted() {
        let gray = block_pattern(64, 48, 4, 9);
        let shot = DynamicImage::ImageLuma8(gray.clone()).to_rgba8();
        let view = image::imageops::crop_imm(&shot, 10, 8, 20, 16).to_image();

        let result = TemplateLocator::default().locate(
            &DynamicImage::ImageRgba8(view),
            &DynamicImage::ImageRgba8(shot),
        );
        assert_eq!(result.point().map(|p| (p.x, p.y)), Some((20, 16)));
    }

    #[test]
    fn oversized_view_not_found() {
        let shot = DynamicImage::ImageLuma8(block_pattern(40, 30, 2, 2));
        let view = DynamicImage::ImageLuma8(block_pattern(41, 10, 2, 2));
        assert_eq!(TemplateLocator::default().locate(&view, &shot), MatchResult::NotFound);

        let tall = DynamicImage::ImageLuma8(block_pattern(10, 31, 2, 2));
        assert_eq!(TemplateLocator::default().locate(&tall, &shot), MatchResult::NotFound);
    }

    #[test]
    fn uniform_on_uniform_found_at_first_offset() {
        let shot = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 30, image::Rgba([90, 90, 90, 255])));
        let view = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 6, image::Rgba([90, 90, 90, 255])));

        let point = TemplateLocator::default().locate(&view, &shot).point().expect("found");
        assert_eq!((point.x, point.y), (5, 3));
        assert!((point.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_view_on_textured_screenshot_not_found() {
        let shot = DynamicImage::ImageLuma8(block_pattern(60, 40, 1, 5));
        let view = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([128])));
        assert_eq!(TemplateLocator::default().locate(&view, &shot), MatchResult::NotFound);
    }

    #[test]
    fn unrelated_view_below_threshold() {
        let shot = DynamicImage::ImageLuma8(block_pattern(80, 60, 1, 11));
        let view = DynamicImage::ImageLuma8(block_pattern(24, 18, 1, 12));
        let locator = TemplateLocator::default();
        let best = locator.best_match(&view, &shot).expect("fits");
        assert!(best.score < DEFAULT_MATCH_THRESHOLD);
        assert_eq!(locator.locate(&view, &shot), MatchResult::NotFound);
    }

    #[test]
    fn ties_keep_first_row_major_offset() {
        // 같은 패턴이 두 번 나타나는 스크린샷
        let tile = block_pattern(10, 10, 2, 3);
        let mut shot = GrayImage::from_pixel(40, 20, Luma([0]));
        image::imageops::replace(&mut shot, &tile, 25, 5);
        image::imageops::replace(&mut shot, &tile, 5, 5);

        let result = TemplateLocator::default().locate(
            &DynamicImage::ImageLuma8(tile),
            &DynamicImage::ImageLuma8(shot),
        );
        assert_eq!(result.point().map(|p| (p.x, p.y)), Some((10, 10)));
    }

    #[test]
    fn locate_is_deterministic() {
        let shot = DynamicImage::ImageLuma8(block_pattern(90, 70, 3, 21));
        let view = DynamicImage::ImageLuma8(crop(&block_pattern(90, 70, 3, 21), 20, 30, 25, 15));
        let locator = TemplateLocator::default();
        assert_eq!(locator.locate(&view, &shot), locator.locate(&view, &shot));
    }

    #[test]
    fn restricted_window_is_respected() {
        let shot = block_pattern(60, 40, 2, 4);
        let template = Template::new(&crop(&shot, 30, 20, 12, 10));
        let search = SearchImage::new(&shot);

        let window = OffsetWindow {
            x_min: 0,
            x_max: 10,
            y_min: 0,
            y_max: 10,
        };
        let best = best_offset(&search, &template, Some(window)).unwrap();
        assert!(best.x <= 10 && best.y <= 10);

        let full = best_offset(&search, &template, None).unwrap();
        assert_eq!((full.x, full.y), (30, 20));
    }
}
