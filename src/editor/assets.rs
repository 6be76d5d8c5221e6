//! Browser side of the admin editor, bundled into the binary.
//!
//! Mirrors [`super::EditorState`]: drag-end writes 6-decimal coordinates,
//! search replies and failures are applied only when their `seq` is the
//! latest one sent, clear resets to the default view.

pub const ADMIN_SCRIPT: &str = r#"(function () {
    'use strict';

    function init() {
        var root = document.querySelector('.wdsgmap_admin_map');
        if (!root || typeof google === 'undefined') {
            return setTimeout(init, 50);
        }

        var G = google.maps;
        var data = root.dataset;
        var addressField = document.getElementById('wdsgmap_address');
        var latField = document.getElementById('wdsgmap_latitude');
        var lngField = document.getElementById('wdsgmap_longitude');
        var notice = document.getElementById('wdsgmap_notice');
        var form = root.closest('form');

        var defaultLoc = new G.LatLng(parseFloat(data.defaultLat), parseFloat(data.defaultLng));
        var defaultZoom = parseInt(data.defaultZoom, 10);
        var streetZoom = parseInt(data.streetZoom, 10);

        var map = new G.Map(document.getElementById('map_canvas'), {
            zoom: parseInt(data.zoom, 10),
            center: new G.LatLng(parseFloat(data.centerLat), parseFloat(data.centerLng)),
            mapTypeId: G.MapTypeId.ROADMAP
        });

        var marker = new G.Marker({ map: map, draggable: true });
        if (data.marker === '1') {
            marker.setPosition(map.getCenter());
        }

        var lastSeq = 0;
        var pending = null;

        function showNotice(visible) {
            if (notice) {
                notice.hidden = !visible;
            }
        }

        function placeMarker(lat, lng) {
            marker.setPosition(new G.LatLng(parseFloat(lat), parseFloat(lng)));
            map.setCenter(marker.getPosition());
            map.setZoom(streetZoom);
            latField.value = lat;
            lngField.value = lng;
        }

        G.event.addListener(marker, 'dragend', function (evt) {
            latField.value = evt.latLng.lat().toFixed(6);
            lngField.value = evt.latLng.lng().toFixed(6);
        });

        document.getElementById('wdsgmap_address_search_submit').addEventListener('click', function (event) {
            event.preventDefault();
            showNotice(false);

            lastSeq += 1;
            var seq = lastSeq;
            pending = seq;

            var body = new URLSearchParams();
            body.set('action', 'wds_gmap_address_search');
            body.set('address', addressField.value);
            body.set('seq', String(seq));

            fetch(data.ajaxUrl, {
                method: 'POST',
                credentials: 'same-origin',
                headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
                body: body
            })
                .then(function (resp) { return resp.json(); })
                .then(function (reply) {
                    if (pending !== seq || reply.seq !== seq) {
                        return;
                    }
                    pending = null;
                    if (reply.found && reply.latitude && reply.longitude) {
                        placeMarker(reply.latitude, reply.longitude);
                    } else {
                        showNotice(true);
                    }
                })
                .catch(function () {
                    if (pending === seq) {
                        pending = null;
                        showNotice(true);
                    }
                });
        });

        document.getElementById('wdsgmap_address_clear').addEventListener('click', function (event) {
            event.preventDefault();
            pending = null;
            addressField.value = '';
            latField.value = '';
            lngField.value = '';
            showNotice(false);
            marker.setPosition(null);
            map.setCenter(defaultLoc);
            map.setZoom(defaultZoom);
        });

        if (form) {
            addressField.addEventListener('keydown', function (event) {
                if (event.key === 'Enter') {
                    event.preventDefault();
                    document.getElementById('wdsgmap_address_search_submit').click();
                }
            });
        }
    }

    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', init);
    } else {
        init();
    }
})();
"#;
