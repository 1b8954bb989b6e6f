//! Canned portal pages for tests.

/// A healthy query page: CSRF token plus CAPTCHA image reference.
pub const QUERY_PAGE: &str = r#"<html><body>
<form method="post">
  <input type="hidden" name="csrftkn" value="abc123token"/>
  <img src="/static/logo.png" alt="logo"/>
  <img src="/judicial/captcha?id=42" alt="verification"/>
  <input type="text" name="c2"/>
</form>
</body></html>"#;

/// Response to a rejected CAPTCHA submission.
pub const WRONG_CAPTCHA_PAGE: &str = r#"<html><body>
<div class="alert">Please enter correct captcha</div>
</body></html>"#;

/// Response to an accepted submission that matched nothing.
pub const NO_RECORDS_PAGE: &str = r#"<html><body>
<div class="alert">No Records Found</div>
</body></html>"#;

/// Response with a result table: header row plus two data rows, the second
/// of which has no document link.
pub const RESULTS_PAGE: &str = r#"<html><body>
<table class="table table-striped table-bordered">
  <tr>
    <th>Appeal</th><th>Parties</th><th>Bench</th><th>Order</th><th>Date</th>
  </tr>
  <tr>
    <td>ITA 1001/Mum/2009<br/>2006-07<br/>Disposed</td>
    <td>DCIT vs Alpha Industries</td>
    <td>A</td>
    <td><a href="/judicial/orders/1001.pdf">View</a></td>
    <td>06/03/2010</td>
  </tr>
  <tr>
    <td>ITA 1002/Mum/2009<br/>2007-08<br/>Pending</td>
    <td>Beta Traders vs ITO</td>
    <td>B</td>
    <td>Not uploaded</td>
    <td>06/03/2010</td>
  </tr>
</table>
</body></html>"#;

/// Same as `RESULTS_PAGE` plus one malformed three-cell row that the
/// extractor must skip.
pub const RESULTS_PAGE_WITH_SHORT_ROW: &str = r#"<html><body>
<table class="table table-striped table-bordered">
  <tr>
    <th>Appeal</th><th>Parties</th><th>Bench</th><th>Order</th><th>Date</th>
  </tr>
  <tr>
    <td>ITA 1001/Mum/2009<br/>2006-07<br/>Disposed</td>
    <td>DCIT vs Alpha Industries</td>
    <td>A</td>
    <td><a href="/judicial/orders/1001.pdf">View</a></td>
    <td>06/03/2010</td>
  </tr>
  <tr>
    <td>spacer</td><td>row</td><td>junk</td>
  </tr>
  <tr>
    <td>ITA 1002/Mum/2009<br/>2007-08<br/>Pending</td>
    <td>Beta Traders vs ITO</td>
    <td>B</td>
    <td>Not uploaded</td>
    <td>06/03/2010</td>
  </tr>
</table>
</body></html>"#;

/// A result table with only its header row.
pub const EMPTY_TABLE_PAGE: &str = r#"<html><body>
<table class="table table-striped table-bordered">
  <tr>
    <th>Appeal</th><th>Parties</th><th>Bench</th><th>Order</th><th>Date</th>
  </tr>
</table>
</body></html>"#;

/// A tiny but decodable CAPTCHA image.
pub fn captcha_png() -> Vec<u8> {
    let img = image::GrayImage::from_pixel(24, 10, image::Luma([60]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("PNG encoding of a fixture image succeeds");
    bytes
}
